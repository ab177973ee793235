//! Core types shared by the chain model, the Jacobian estimator and the solver.

use nalgebra::{Matrix4, Vector6};
use serde::{Deserialize, Serialize};

use crate::utils::wrap_degrees;

/// Joint angles in degrees, one per joint of the chain.
pub type Joints = Vec<f64>;

/// 4x4 homogeneous transform (rotation block, translation column, [0, 0, 0, 1] row).
pub type Transform = Matrix4<f64>;

/// Below this |cos(pitch)| the roll and yaw extraction is no longer unique.
pub const GIMBAL_LOCK_THRESHOLD: f64 = 1e-6;

/// End-effector pose: Cartesian position and roll, pitch, yaw in degrees.
///
/// A pose is always derived from a joint angle vector and never stored by the chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// x, y, z in the length unit of the DH parameters
    pub position: [f64; 3],
    /// roll, pitch, yaw in degrees
    pub orientation: [f64; 3],
}

impl Pose {
    pub fn new(position: [f64; 3], orientation: [f64; 3]) -> Self {
        Pose { position, orientation }
    }

    /// Extracts position and roll, pitch, yaw from a homogeneous transform.
    ///
    /// Near pitch = ±90° (gimbal lock) roll and yaw become coupled and the
    /// decomposition is not unique; see [`Pose::is_degenerate`].
    pub fn from_transform(t: &Transform) -> Self {
        let roll = t[(2, 1)].atan2(t[(2, 2)]);
        let pitch = (-t[(2, 0)]).atan2(t[(2, 1)].hypot(t[(2, 2)]));
        let yaw = t[(1, 0)].atan2(t[(0, 0)]);

        Pose {
            position: [t[(0, 3)], t[(1, 3)], t[(2, 3)]],
            orientation: [roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()],
        }
    }

    /// True if the orientation was extracted at (or very near) gimbal lock.
    /// This is reduced precision, not an error.
    pub fn is_degenerate(&self) -> bool {
        self.orientation[1].to_radians().cos().abs() < GIMBAL_LOCK_THRESHOLD
    }

    /// Position and orientation concatenated into a 6-vector.
    pub fn to_vector6(&self) -> Vector6<f64> {
        let [x, y, z] = self.position;
        let [roll, pitch, yaw] = self.orientation;
        Vector6::new(x, y, z, roll, pitch, yaw)
    }

    /// Difference `target - self`. The angular components are wrapped into
    /// [-180, 180) so that poses across the ±180° seam stay close.
    pub fn error_to(&self, target: &Pose) -> Vector6<f64> {
        let mut error = target.to_vector6() - self.to_vector6();
        for i in 3..6 {
            error[i] = wrap_degrees(error[i]);
        }
        error
    }
}

/// Forward kinematics of a serial chain. Angles are in degrees; `angles.len()`
/// is expected to equal [`Kinematics::dof`].
pub trait Kinematics: Send + Sync {
    /// Number of joints.
    fn dof(&self) -> usize;

    /// Base to end-effector transform.
    fn forward(&self, angles: &[f64]) -> Transform;

    /// End-effector pose.
    fn pose(&self, angles: &[f64]) -> Pose {
        Pose::from_transform(&self.forward(angles))
    }
}
