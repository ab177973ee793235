//! Error taxonomy of the kinematics core.
//!
//! All of these are local and recoverable. Only a [`ConfigurationError`] at
//! construction time makes a chain unusable.

use serde::Serialize;
use thiserror::Error;

/// The chain (or an angle vector handed to it) does not describe a usable configuration.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum ConfigurationError {
    #[error("chain must contain at least one joint")]
    EmptyChain,

    #[error("joint {joint}: lower limit {min_deg}° must be below upper limit {max_deg}°")]
    InvalidLimits { joint: usize, min_deg: f64, max_deg: f64 },

    #[error("joint {joint}: {field} must be finite")]
    NonFinite { joint: usize, field: &'static str },

    #[error("expected {expected} joint angles, found {found}")]
    JointCountMismatch { expected: usize, found: usize },

    #[error("joint {joint} does not exist, chain has {dof} joints")]
    NoSuchJoint { joint: usize, dof: usize },
}

/// Which side of the joint range was crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LimitBound {
    Lower,
    Upper,
}

/// A requested angle lies outside its joint's limits. The whole move is refused.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("joint {joint}: angle {angle}° exceeds {bound:?} limit {limit}°")]
pub struct LimitViolation {
    pub joint: usize,
    pub angle: f64,
    pub bound: LimitBound,
    pub limit: f64,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum KinematicsError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    LimitViolation(#[from] LimitViolation),

    /// The Jacobian could not be pseudo-inverted. A different seed or target may work.
    #[error("singular configuration, pseudo-inverse failed after {iterations} iterations")]
    SingularConfiguration { iterations: usize },

    #[error("no convergence after {iterations} iterations, remaining error {error_norm}")]
    NonConvergence { iterations: usize, error_norm: f64 },

    /// The actuation layer reported that the move was not carried out.
    #[error("actuator failed to execute the move")]
    ActuationFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_joint() {
        let violation = LimitViolation { joint: 0, angle: 200.0, bound: LimitBound::Upper, limit: 180.0 };
        assert_eq!(violation.to_string(), "joint 0: angle 200° exceeds Upper limit 180°");

        let error: KinematicsError = violation.into();
        assert_eq!(error.to_string(), "joint 0: angle 200° exceeds Upper limit 180°");

        let error: KinematicsError = ConfigurationError::JointCountMismatch { expected: 6, found: 5 }.into();
        assert_eq!(error.to_string(), "expected 6 joint angles, found 5");
    }
}
