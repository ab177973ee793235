//! Iterative inverse kinematics based on the pseudo-inverse of the numeric Jacobian.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::jacobian::{DEFAULT_EPSILON, DEFAULT_SINGULAR_VALUE_THRESHOLD, Jacobian};
use crate::kinematic_traits::{Joints, Kinematics, Pose};
use crate::kinematics_error::{ConfigurationError, KinematicsError};
use crate::kinematics_impl::ChainModel;
use crate::utils::{format_joints, is_valid};

/// Solver tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IkConfig {
    /// Upper bound on the number of Jacobian updates.
    pub max_iterations: usize,

    /// Converged when the Euclidean norm of the error vector drops below this value.
    /// Position (length units) and orientation (degrees) are mixed without rescaling.
    pub tolerance: f64,

    /// Fraction of the pseudo-inverse step applied per iteration.
    pub step_factor: f64,

    /// Finite difference step of the Jacobian, degrees.
    pub epsilon: f64,

    /// Singular values at or below this are treated as zero by the pseudo-inverse.
    pub singular_value_threshold: f64,
}

impl Default for IkConfig {
    fn default() -> Self {
        IkConfig {
            max_iterations: 100,
            tolerance: 1e-3,
            step_factor: 0.1,
            epsilon: DEFAULT_EPSILON,
            singular_value_threshold: DEFAULT_SINGULAR_VALUE_THRESHOLD,
        }
    }
}

/// What the end-effector must reach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IkTarget {
    /// Only the position matters, orientation is free. Uses the position rows of the Jacobian.
    Position([f64; 3]),

    /// Position and roll, pitch, yaw (degrees).
    Pose(Pose),
}

impl IkTarget {
    /// Full pose target, the orientation defaults to [0, 0, 0].
    pub fn pose(position: [f64; 3], orientation: Option<[f64; 3]>) -> Self {
        IkTarget::Pose(Pose::new(position, orientation.unwrap_or([0.0, 0.0, 0.0])))
    }

    /// `target - current`, 3 entries for a position target and 6 for a pose target.
    pub fn error_from(&self, current: &Pose) -> DVector<f64> {
        match self {
            IkTarget::Position(position) => {
                let [x, y, z] = current.position;
                DVector::from_column_slice(&[position[0] - x, position[1] - y, position[2] - z])
            }
            IkTarget::Pose(pose) => {
                DVector::from_column_slice(current.error_to(pose).as_slice())
            }
        }
    }
}

/// Terminal state of the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IkStatus {
    Converged,
    DivergedSingular,
    Exhausted,
}

/// Best-effort outcome of a solve. The angles are the last attempted iterate,
/// not necessarily the seed, even when the solver failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IkResult {
    pub angles: Joints,
    pub status: IkStatus,
    /// Number of updates applied to the seed.
    pub iterations: usize,
    /// Error norm at the returned angles.
    pub error_norm: f64,
}

impl IkResult {
    pub fn is_converged(&self) -> bool {
        self.status == IkStatus::Converged
    }

    /// The error describing a failed solve, `None` if converged.
    pub fn failure(&self) -> Option<KinematicsError> {
        match self.status {
            IkStatus::Converged => None,
            IkStatus::DivergedSingular => Some(KinematicsError::SingularConfiguration { iterations: self.iterations }),
            IkStatus::Exhausted => Some(KinematicsError::NonConvergence {
                iterations: self.iterations,
                error_norm: self.error_norm,
            }),
        }
    }

    /// The solved angles, or the failure as an error.
    pub fn into_result(self) -> Result<Joints, KinematicsError> {
        match self.failure() {
            None => Ok(self.angles),
            Some(err) => Err(err),
        }
    }
}

/// Damped pseudo-inverse Jacobian solver:
/// `angles += step_factor * pinv(J) * (target - pose(angles))`, then hard clamp into limits.
#[derive(Debug, Clone, Default)]
pub struct IkSolver {
    config: IkConfig,
}

impl IkSolver {
    pub fn new(config: IkConfig) -> Self {
        IkSolver { config }
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &IkConfig {
        &self.config
    }

    /// Solves starting from an arbitrary seed. The seed is clamped into the limits
    /// before the first iteration; non-finite seed angles are refused.
    pub fn solve(&self, chain: &ChainModel, target: &IkTarget, seed: &[f64]) -> Result<IkResult, KinematicsError> {
        if seed.len() != chain.dof() {
            return Err(ConfigurationError::JointCountMismatch { expected: chain.dof(), found: seed.len() }.into());
        }
        if !is_valid(seed) {
            let joint = seed.iter().position(|a| !a.is_finite()).unwrap_or_default();
            return Err(ConfigurationError::NonFinite { joint, field: "seed angle" }.into());
        }
        let mut seed = seed.to_vec();
        chain.clamp(&mut seed);
        Ok(self.solve_from_valid_seed(chain, target, seed))
    }

    /// Seed must have the chain's joint count and lie within limits.
    pub(crate) fn solve_from_valid_seed(&self, chain: &ChainModel, target: &IkTarget, seed: Joints) -> IkResult {
        let config = &self.config;
        let mut angles = seed;

        for iteration in 0..config.max_iterations {
            let error = target.error_from(&chain.pose(&angles));
            let error_norm = error.norm();
            trace!("IK iteration {}: {} error {:.6}", iteration, format_joints(&angles), error_norm);

            if error_norm < config.tolerance {
                debug!("IK converged after {} iterations: {}", iteration, format_joints(&angles));
                return IkResult { angles, status: IkStatus::Converged, iterations: iteration, error_norm };
            }

            let mut jacobian = Jacobian::from_valid_angles(chain, &angles, config.epsilon);
            if let IkTarget::Position(_) = target {
                jacobian = jacobian.linear();
            }
            let delta = match jacobian.solve(&error, config.singular_value_threshold) {
                Some(delta) if is_valid(delta.as_slice()) => delta,
                _ => {
                    warn!("IK diverged at singular configuration {}", format_joints(&angles));
                    return IkResult {
                        angles,
                        status: IkStatus::DivergedSingular,
                        iterations: iteration,
                        error_norm,
                    };
                }
            };

            for (angle, step) in angles.iter_mut().zip(delta.iter()) {
                *angle += config.step_factor * step;
            }
            chain.clamp(&mut angles);
        }

        // The last update may have reached the target
        let error_norm = target.error_from(&chain.pose(&angles)).norm();
        let status = if error_norm < config.tolerance {
            debug!("IK converged after {} iterations: {}", config.max_iterations, format_joints(&angles));
            IkStatus::Converged
        } else {
            debug!(
                "IK exhausted {} iterations, remaining error {:.6}",
                config.max_iterations, error_norm
            );
            IkStatus::Exhausted
        };
        IkResult { angles, status, iterations: config.max_iterations, error_norm }
    }
}
