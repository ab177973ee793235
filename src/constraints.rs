use crate::kinematics_error::{ConfigurationError, LimitBound, LimitViolation};
use crate::parameters::JointSpec;

/// Angular limits of every joint, degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    /// Lower limit per joint
    pub from: Vec<f64>,

    /// Upper limit per joint, always above the lower one
    pub to: Vec<f64>,
}

impl Constraints {
    pub fn new(from: Vec<f64>, to: Vec<f64>) -> Result<Self, ConfigurationError> {
        if from.len() != to.len() {
            return Err(ConfigurationError::JointCountMismatch { expected: from.len(), found: to.len() });
        }
        for (joint, (&min_deg, &max_deg)) in from.iter().zip(to.iter()).enumerate() {
            if !(min_deg < max_deg) {
                return Err(ConfigurationError::InvalidLimits { joint, min_deg, max_deg });
            }
        }
        Ok(Constraints { from, to })
    }

    /// Collects the limits of the given joints.
    pub fn from_joints(joints: &[JointSpec]) -> Result<Self, ConfigurationError> {
        Self::new(
            joints.iter().map(|j| j.min_deg()).collect(),
            joints.iter().map(|j| j.max_deg()).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.from.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_empty()
    }

    /// Reports the first joint (lowest index) outside its limits. Bounds are inclusive.
    /// NaN is reported as an upper limit violation.
    pub fn check(&self, angles: &[f64]) -> Result<(), LimitViolation> {
        for (joint, &angle) in angles.iter().enumerate().take(self.len()) {
            let (lower, upper) = (self.from[joint], self.to[joint]);
            if angle >= lower && angle <= upper {
                continue;
            }
            let (bound, limit) = if angle < lower {
                (LimitBound::Lower, lower)
            } else {
                (LimitBound::Upper, upper)
            };
            return Err(LimitViolation { joint, angle, bound, limit });
        }
        Ok(())
    }

    pub fn compliant(&self, angles: &[f64]) -> bool {
        self.check(angles).is_ok()
    }

    /// Hard clamps every angle into its joint's range.
    pub fn clamp(&self, angles: &mut [f64]) {
        for (angle, (&lower, &upper)) in angles.iter_mut().zip(self.from.iter().zip(self.to.iter())) {
            *angle = angle.clamp(lower, upper);
        }
    }

    /// Angle closest to zero inside each joint's range.
    pub fn rest_position(&self) -> Vec<f64> {
        let mut rest = vec![0.0; self.len()];
        self.clamp(&mut rest);
        rest
    }
}
