//! Rust implementation of forward and numeric inverse kinematics for serial arms
//! built from rotational joints described by Denavit-Hartenberg parameters.
//!
//! # Features
//!
//! - Forward kinematics of an arbitrary chain of DH joints, end-effector pose as position
//!   and roll, pitch, yaw in degrees. Gimbal lock is reported, not treated as an error.
//! - Joint limits: angle vectors are validated as a whole; a move with any joint out of
//!   range is refused and names the offending joint and bound.
//! - Numeric Jacobian (forward differences, perturbation in degrees), its pseudo-inverse,
//!   and joint torques from an end-effector wrench.
//! - Iterative inverse kinematics (damped pseudo-inverse steps with hard limit clamping)
//!   for full pose or position-only targets. The solver always returns a best-effort
//!   angle vector with the status `Converged`, `DivergedSingular` or `Exhausted`.
//! - Moves: linear joint space interpolation at 20 steps per second, handed to an
//!   [`actuation::Actuator`]. The chain only records the new angles if the actuator succeeded.
//! - Named presets and YAML chain descriptions (feature `allow_filesystem`, default).
//!
//! All angles at the API surface are in degrees. DH twist and offset are stored in radians.
//!
//! ```
//! use dh_arm_kinematics::kinematics_impl::ChainModel;
//! use dh_arm_kinematics::parameters_robots::two_link_planar;
//!
//! let chain = ChainModel::new(two_link_planar()).expect("valid chain");
//! let pose = chain.end_effector_pose(&[0.0, 0.0]).expect("two angles");
//! assert!((pose.position[0] - 2.0).abs() < 1e-12);
//! ```

pub mod dh_transform;
pub mod parameters;
pub mod parameters_robots;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;

#[path = "utils/utils.rs"]
pub mod utils;
pub mod kinematic_traits;
pub mod kinematics_impl;
pub mod kinematics_error;
pub mod parameter_error;

pub mod constraints;

pub mod jacobian;

pub mod ik_solver;

#[path = "path_plan/motion.rs"]
pub mod motion;

pub mod actuation;

pub mod presets;

#[cfg(test)]
mod tests;
