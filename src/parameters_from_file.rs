//! Supports reading the chain description from a YAML file (optional)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::kinematic_traits::Joints;
use crate::kinematics_error::KinematicsError;
use crate::kinematics_impl::ChainModel;
use crate::parameter_error::ParameterError;
use crate::parameters::JointSpec;

/// One joint as written in the file. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JointConfig {
    #[serde(default)]
    pub a: f64,
    #[serde(default)]
    pub alpha_deg: f64,
    #[serde(default)]
    pub d: f64,
    #[serde(default)]
    pub theta_offset_deg: f64,
    pub limits: [f64; 2],
}

impl From<&JointSpec> for JointConfig {
    fn from(joint: &JointSpec) -> Self {
        JointConfig {
            a: joint.a,
            alpha_deg: joint.alpha.to_degrees(),
            d: joint.d,
            theta_offset_deg: joint.theta_offset.to_degrees(),
            limits: joint.limits,
        }
    }
}

impl From<&JointConfig> for JointSpec {
    fn from(joint: &JointConfig) -> Self {
        JointSpec::new(
            joint.a,
            joint.alpha_deg.to_radians(),
            joint.d,
            joint.theta_offset_deg.to_radians(),
            joint.limits,
        )
    }
}

/// Chain description with optional starting angles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
    pub joints: Vec<JointConfig>,
    #[serde(default)]
    pub initial_angles: Option<Joints>,
}

impl ChainConfig {
    /// Read the chain from YAML. A file like this is supported:
    /// ```yaml
    /// # Two link planar arm
    /// joints:
    ///   - { a: 1.0, alpha_deg: 0, d: 0, theta_offset_deg: 0, limits: [-180, 180] }
    ///   - { a: 1.0, limits: [-180, 180] }
    /// initial_angles: [0, 90]
    /// ```
    /// Everything but `limits` defaults to zero; `initial_angles` is optional.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        let config: ChainConfig =
            serde_saphyr::from_str(contents).map_err(|e| ParameterError::ParseError(format!("{}", e)))?;

        for (i, joint) in config.joints.iter().enumerate() {
            JointSpec::from(joint).validate(i)?;
        }
        if let Some(angles) = &config.initial_angles {
            if angles.len() != config.joints.len() {
                return Err(ParameterError::InvalidLength { expected: config.joints.len(), found: angles.len() });
            }
        }
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Describes the chain and its current angles.
    pub fn from_chain(chain: &ChainModel) -> Self {
        ChainConfig {
            joints: chain.joints().iter().map(JointConfig::from).collect(),
            initial_angles: Some(chain.current_angles().to_vec()),
        }
    }

    /// Writes the same format [`ChainConfig::from_yaml_str`] reads.
    pub fn to_yaml(&self) -> String {
        let mut yaml = String::from("joints:\n");
        for joint in &self.joints {
            yaml.push_str(&format!(
                "  - {{ a: {:?}, alpha_deg: {:?}, d: {:?}, theta_offset_deg: {:?}, limits: [{:?}, {:?}] }}\n",
                joint.a, joint.alpha_deg, joint.d, joint.theta_offset_deg, joint.limits[0], joint.limits[1]
            ));
        }
        if let Some(angles) = &self.initial_angles {
            yaml.push_str(&format!(
                "initial_angles: [{}]\n",
                angles.iter().map(|a| format!("{:?}", a)).collect::<Vec<_>>().join(", ")
            ));
        }
        yaml
    }

    pub fn joint_specs(&self) -> Vec<JointSpec> {
        self.joints.iter().map(JointSpec::from).collect()
    }

    /// Builds the chain, starting at `initial_angles` if given.
    pub fn into_chain(self) -> Result<ChainModel, KinematicsError> {
        let joints = self.joint_specs();
        match self.initial_angles {
            Some(angles) => ChainModel::with_angles(joints, &angles),
            None => Ok(ChainModel::new(joints)?),
        }
    }
}
