use nalgebra::linalg::SVD;
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::kinematic_traits::{Joints, Kinematics};
use crate::kinematics_error::ConfigurationError;
use crate::utils::dvector_to_joints;

/// Default finite difference step, in degrees.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Default threshold below which singular values are treated as zero.
pub const DEFAULT_SINGULAR_VALUE_THRESHOLD: f64 = 1e-8;

/// Iteration budget of the SVD before the matrix is considered degenerate.
const MAX_SVD_ITERATIONS: usize = 1000;

/// Struct representing the Jacobian matrix
pub struct Jacobian {
    /// A 6xN matrix representing the Jacobian
    ///
    /// Each column corresponds to a joint. The first three rows are the position
    /// sensitivity (length unit per degree), the last three the roll, pitch and
    /// yaw sensitivity (degrees per degree).
    matrix: DMatrix<f64>,

    /// The disturbance value used for computing the Jacobian, degrees
    epsilon: f64,
}

impl Jacobian {
    /// Constructs a new Jacobian struct by computing the Jacobian matrix for the given robot and joint configuration
    ///
    /// # Arguments
    ///
    /// * `robot` - A reference to the robot implementing the Kinematics trait
    /// * `angles` - Joint angles in degrees
    /// * `epsilon` - Finite difference step, added directly to the degree values
    ///
    /// Fails if the number of angles differs from the robot's joint count.
    pub fn new(robot: &impl Kinematics, angles: &[f64], epsilon: f64) -> Result<Self, ConfigurationError> {
        let matrix = compute_jacobian(robot, angles, epsilon)?;
        Ok(Self { matrix, epsilon })
    }

    /// Angles must already match the robot's joint count.
    pub(crate) fn from_valid_angles(robot: &impl Kinematics, angles: &[f64], epsilon: f64) -> Self {
        Self { matrix: jacobian_columns(robot, angles, epsilon), epsilon }
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Only the position rows (3xN).
    pub fn linear(&self) -> Jacobian {
        Jacobian {
            matrix: self.matrix.rows(0, 3).into_owned(),
            epsilon: self.epsilon,
        }
    }

    /// Moore-Penrose pseudo-inverse (Nx6, or Nx3 for the linear part).
    ///
    /// Singular values at or below `threshold` are treated as zero. Returns `None`
    /// if the matrix has non-finite entries, the decomposition does not converge,
    /// or no singular value exceeds the threshold.
    pub fn pseudo_inverse(&self, threshold: f64) -> Option<DMatrix<f64>> {
        if !self.matrix.iter().all(|v| v.is_finite()) {
            return None;
        }
        let svd = SVD::try_new(self.matrix.clone(), true, true, f64::EPSILON, MAX_SVD_ITERATIONS)?;
        if svd.rank(threshold) == 0 {
            return None;
        }
        svd.pseudo_inverse(threshold).ok()
    }

    /// Least squares joint deltas (degrees) that produce the given pose change.
    ///
    /// `error` must have one entry per row of the matrix.
    pub fn solve(&self, error: &DVector<f64>, threshold: f64) -> Option<DVector<f64>> {
        self.pseudo_inverse(threshold).map(|inverse| inverse * error)
    }

    /// Computes the joint torques for the given end-effector force/torque (J^T * f).
    pub fn torques_from_vector(&self, desired_force_torque: &DVector<f64>) -> Joints {
        let joint_torques = self.matrix.transpose() * desired_force_torque;
        dvector_to_joints(&joint_torques)
    }
}

/// Function to compute the Jacobian matrix for a given robot and joint configuration
///
/// Forward difference: for every joint `i`, `angles[i] += epsilon` (degrees), then
/// `J[:, i] = (pose(perturbed) - pose(angles)) / epsilon`. Orientation differences
/// are wrapped into [-180, 180). The result is accurate to O(epsilon); an epsilon
/// too small for the coordinate scale loses precision to cancellation.
pub fn compute_jacobian(
    robot: &impl Kinematics,
    angles: &[f64],
    epsilon: f64,
) -> Result<DMatrix<f64>, ConfigurationError> {
    if angles.len() != robot.dof() {
        return Err(ConfigurationError::JointCountMismatch { expected: robot.dof(), found: angles.len() });
    }
    Ok(jacobian_columns(robot, angles, epsilon))
}

fn jacobian_columns(robot: &impl Kinematics, angles: &[f64], epsilon: f64) -> DMatrix<f64> {
    let n = angles.len();
    let current_pose = robot.pose(angles);

    let jacobian_columns: Vec<_> = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut perturbed = angles.to_vec();
            perturbed[i] += epsilon;
            current_pose.error_to(&robot.pose(&perturbed)) / epsilon
        })
        .collect();

    let mut jacobian = DMatrix::zeros(6, n);
    for (i, column) in jacobian_columns.into_iter().enumerate() {
        jacobian.fixed_view_mut::<6, 1>(0, i).copy_from(&column);
    }
    jacobian
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematic_traits::Transform;
    use approx::assert_relative_eq;
    use nalgebra::{Rotation3, Translation3};

    /// Single rotary joint of the length 1 about z. Rotating the joint moves the
    /// tip tangentially and turns the yaw by the same angle.
    struct SingleRotaryJointRobot;

    impl Kinematics for SingleRotaryJointRobot {
        fn dof(&self) -> usize {
            1
        }

        fn forward(&self, angles: &[f64]) -> Transform {
            let angle = angles[0].to_radians();
            Translation3::new(angle.cos(), angle.sin(), 0.0).to_homogeneous()
                * Rotation3::from_euler_angles(0.0, 0.0, angle).to_homogeneous()
        }
    }

    #[test]
    fn test_compute_jacobian() {
        let robot = SingleRotaryJointRobot;
        let jacobian = compute_jacobian(&robot, &[0.0], DEFAULT_EPSILON).expect("one angle");
        assert_eq!(jacobian.shape(), (6, 1));

        let per_degree = 1.0_f64.to_radians();
        assert!(jacobian[(0, 0)].abs() < 1e-6); // No effect on x at 0°
        assert_relative_eq!(jacobian[(1, 0)], per_degree, max_relative = 1e-4);
        assert_eq!(jacobian[(2, 0)], 0.0);
        assert_eq!(jacobian[(3, 0)], 0.0);
        assert_eq!(jacobian[(4, 0)], 0.0);
        assert_relative_eq!(jacobian[(5, 0)], 1.0, max_relative = 1e-4);
    }

    #[test]
    fn test_angle_count_must_match() {
        let robot = SingleRotaryJointRobot;
        assert_eq!(
            compute_jacobian(&robot, &[0.0, 10.0], DEFAULT_EPSILON),
            Err(ConfigurationError::JointCountMismatch { expected: 1, found: 2 })
        );
        assert!(Jacobian::new(&robot, &[], DEFAULT_EPSILON).is_err());
    }

    #[test]
    fn test_jacobian_across_yaw_seam() {
        // yaw jumps from 180 to -180 under the perturbation
        let robot = SingleRotaryJointRobot;
        let jacobian = compute_jacobian(&robot, &[180.0 - 0.5 * DEFAULT_EPSILON], DEFAULT_EPSILON).expect("one angle");
        assert_relative_eq!(jacobian[(5, 0)], 1.0, max_relative = 1e-3);
    }

    #[test]
    fn test_solve_recovers_joint_delta() {
        let robot = SingleRotaryJointRobot;
        let jacobian = Jacobian::new(&robot, &[30.0], DEFAULT_EPSILON).expect("one angle");
        // Pose change of a 2° joint step
        let error = jacobian.matrix().column(0).into_owned() * 2.0;
        let delta = jacobian.solve(&error, DEFAULT_SINGULAR_VALUE_THRESHOLD).expect("regular");
        assert_relative_eq!(delta[0], 2.0, max_relative = 1e-9);
    }

    #[test]
    fn test_linear_part() {
        let robot = SingleRotaryJointRobot;
        let jacobian = Jacobian::new(&robot, &[90.0], DEFAULT_EPSILON).expect("one angle").linear();
        assert_eq!(jacobian.matrix().shape(), (3, 1));
        assert_relative_eq!(jacobian.matrix()[(0, 0)], -(1.0_f64.to_radians()), max_relative = 1e-4);
    }

    #[test]
    fn test_zero_jacobian_has_no_pseudo_inverse() {
        let jacobian = Jacobian { matrix: DMatrix::zeros(6, 2), epsilon: DEFAULT_EPSILON };
        assert!(jacobian.pseudo_inverse(DEFAULT_SINGULAR_VALUE_THRESHOLD).is_none());
    }

    #[test]
    fn test_non_finite_jacobian_has_no_pseudo_inverse() {
        let mut matrix = DMatrix::identity(6, 6);
        matrix[(2, 3)] = f64::NAN;
        let jacobian = Jacobian { matrix, epsilon: DEFAULT_EPSILON };
        assert!(jacobian.pseudo_inverse(DEFAULT_SINGULAR_VALUE_THRESHOLD).is_none());
    }

    #[test]
    fn test_rank_deficient_pseudo_inverse() {
        // Two identical columns: the minimum norm solution splits the delta evenly
        let mut matrix = DMatrix::zeros(6, 2);
        matrix[(5, 0)] = 1.0;
        matrix[(5, 1)] = 1.0;
        let jacobian = Jacobian { matrix, epsilon: DEFAULT_EPSILON };
        let error = DVector::from_column_slice(&[0.0, 0.0, 0.0, 0.0, 0.0, 4.0]);
        let delta = jacobian.solve(&error, DEFAULT_SINGULAR_VALUE_THRESHOLD).expect("rank one");
        assert_relative_eq!(delta[0], 2.0, max_relative = 1e-9);
        assert_relative_eq!(delta[1], 2.0, max_relative = 1e-9);
    }

    #[test]
    fn test_compute_joint_torques() {
        let robot = SingleRotaryJointRobot;
        let jacobian = Jacobian::new(&robot, &[0.0], DEFAULT_EPSILON).expect("one angle");
        // Pure torque about z maps onto the single joint
        let wrench = DVector::from_column_slice(&[0.0, 0.0, 0.0, 0.0, 0.0, 1.234]);
        let torques = jacobian.torques_from_vector(&wrench);
        assert_eq!(torques.len(), 1);
        assert_relative_eq!(torques[0], 1.234, max_relative = 1e-4);
    }
}
