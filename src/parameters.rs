//! Defines the per-joint DH parameter data structure

use serde::{Deserialize, Serialize};

use crate::dh_transform::dh_transform;
use crate::kinematic_traits::Transform;
use crate::kinematics_error::ConfigurationError;

/// Parameters of a single rotational joint in the Denavit-Hartenberg convention,
/// together with its angular limits. See [parameters_robots.rs](parameters_robots.rs)
/// for concrete chains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    /// Link length, distance between the z axes along the common normal.
    pub a: f64,

    /// Link twist in radians, angle between the z axes about the common normal.
    pub alpha: f64,

    /// Link offset along the previous z axis.
    pub d: f64,

    /// Added to the commanded joint angle, radians. Moves the zero position of the joint.
    pub theta_offset: f64,

    /// Lower and upper angular limit in degrees, lower strictly below upper.
    pub limits: [f64; 2],
}

impl JointSpec {
    pub fn new(a: f64, alpha: f64, d: f64, theta_offset: f64, limits: [f64; 2]) -> Self {
        JointSpec { a, alpha, d, theta_offset, limits }
    }

    pub fn min_deg(&self) -> f64 {
        self.limits[0]
    }

    pub fn max_deg(&self) -> f64 {
        self.limits[1]
    }

    /// Transform of this joint at the given commanded angle (degrees).
    pub fn transform(&self, angle_deg: f64) -> Transform {
        dh_transform(self.a, self.alpha, self.d, angle_deg.to_radians() + self.theta_offset)
    }

    /// Checks that all values are finite and the limits are ordered.
    /// `joint` is only used to report the offending index.
    pub fn validate(&self, joint: usize) -> Result<(), ConfigurationError> {
        for (field, value) in [
            ("a", self.a),
            ("alpha", self.alpha),
            ("d", self.d),
            ("theta_offset", self.theta_offset),
            ("min_deg", self.limits[0]),
            ("max_deg", self.limits[1]),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite { joint, field });
            }
        }
        if self.limits[0] >= self.limits[1] {
            return Err(ConfigurationError::InvalidLimits {
                joint,
                min_deg: self.limits[0],
                max_deg: self.limits[1],
            });
        }
        Ok(())
    }
}
