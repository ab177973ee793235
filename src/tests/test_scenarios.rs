use std::time::Duration;

use approx::assert_abs_diff_eq;

use crate::ik_solver::{IkConfig, IkStatus, IkTarget};
use crate::jacobian::{DEFAULT_EPSILON, Jacobian};
use crate::kinematic_traits::Transform;
use crate::kinematics_error::{KinematicsError, LimitBound, LimitViolation};
use crate::kinematics_impl::ChainModel;
use crate::parameters::JointSpec;
use crate::parameters_robots::two_link_planar;
use crate::tests::test_utils::RecordingActuator;

#[test]
fn test_identity_chain_yields_identity() {
    let joints = vec![JointSpec::new(0.0, 0.0, 0.0, 0.0, [-180.0, 180.0]); 3];
    let chain = ChainModel::new(joints).expect("valid chain");
    let t = chain.forward_kinematics(&[0.0, 0.0, 0.0]).expect("matching count");
    assert_eq!(t, Transform::identity());
    assert_eq!(chain.end_effector_pose(&[0.0, 0.0, 0.0]).expect("matching count").position, [0.0; 3]);
}

#[test]
fn test_two_link_forward() {
    let chain = ChainModel::new(two_link_planar()).expect("valid chain");

    let pose = chain.end_effector_pose(&[0.0, 0.0]).expect("matching count");
    assert_abs_diff_eq!(pose.position[0], 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(pose.position[1], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(pose.position[2], 0.0, epsilon = 1e-12);

    // Both links along y when the first joint turns by 90°
    let pose = chain.end_effector_pose(&[90.0, 0.0]).expect("matching count");
    assert_abs_diff_eq!(pose.position[0], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(pose.position[1], 2.0, epsilon = 1e-12);
}

#[test]
fn test_two_link_reaches_unit_y() {
    // (0, 1, 0) lies at [30, 120] or [150, -120]. The seed picks the branch.
    let chain = ChainModel::with_angles(two_link_planar(), &[0.0, 90.0]).expect("valid seed");
    let result = chain.solve(&IkTarget::Position([0.0, 1.0, 0.0]), &IkConfig::default());
    assert_eq!(result.status, IkStatus::Converged);
    assert!(result.iterations < 100);
    assert_abs_diff_eq!(result.angles[0], 30.0, epsilon = 0.1);
    assert_abs_diff_eq!(result.angles[1], 120.0, epsilon = 0.1);

    let pose = chain.end_effector_pose(&result.angles).expect("matching count");
    assert_abs_diff_eq!(pose.position[0], 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(pose.position[1], 1.0, epsilon = 1e-3);
}

#[test]
fn test_two_link_reaches_unit_y_from_various_seeds() {
    for seed in [[45.0, 90.0], [20.0, 60.0], [60.0, 60.0], [10.0, 150.0], [45.0, 45.0]] {
        let chain = ChainModel::with_angles(two_link_planar(), &seed).expect("valid seed");
        let result = chain.solve(&IkTarget::Position([0.0, 1.0, 0.0]), &IkConfig::default());
        assert!(result.is_converged(), "seed {:?}: {:?}", seed, result);
        assert_abs_diff_eq!(result.angles[0], 30.0, epsilon = 0.1);
        assert_abs_diff_eq!(result.angles[1], 120.0, epsilon = 0.1);
    }
}

#[test]
fn test_two_link_full_pose_target() {
    // (1, 1, 0) with yaw 0 is [90, -90]
    let chain = ChainModel::with_angles(two_link_planar(), &[80.0, -80.0]).expect("valid seed");
    let config = IkConfig { step_factor: 0.5, max_iterations: 200, ..IkConfig::default() };
    let result = chain.inverse_kinematics([1.0, 1.0, 0.0], None, &config);
    assert!(result.is_converged(), "{:?}", result);
    assert_abs_diff_eq!(result.angles[0], 90.0, epsilon = 0.1);
    assert_abs_diff_eq!(result.angles[1], -90.0, epsilon = 0.1);
}

#[test]
fn test_stretched_seed_is_stuck() {
    // The stretched rest configuration [0, 0] is singular, the solver does not recover from it
    let chain = ChainModel::new(two_link_planar()).expect("valid chain");
    let result = chain.solve(&IkTarget::Position([0.0, 1.0, 0.0]), &IkConfig::default());
    assert!(!result.is_converged());
    assert!(result.failure().is_some());
    assert_eq!(result.angles.len(), 2);
    assert!(result.angles.iter().all(|a| a.is_finite()));
}

#[test]
fn test_move_out_of_range_refused() {
    let mut chain = ChainModel::with_angles(two_link_planar(), &[10.0, 20.0]).expect("valid chain");
    let mut actuator = RecordingActuator::default();

    let err = chain
        .move_to_angles(&[200.0, 0.0], Duration::from_secs(1), &mut actuator)
        .unwrap_err();
    assert_eq!(
        err,
        KinematicsError::LimitViolation(LimitViolation {
            joint: 0,
            angle: 200.0,
            bound: LimitBound::Upper,
            limit: 180.0
        })
    );
    assert_eq!(chain.current_angles(), &[10.0, 20.0]);
    assert!(actuator.moves.is_empty());
}

#[test]
fn test_single_joint_jacobian_matches_tangent() {
    let chain = ChainModel::new(vec![JointSpec::new(1.0, 0.0, 0.0, 0.0, [-180.0, 180.0])]).expect("valid chain");
    let angle = 30.0_f64;
    let jacobian = Jacobian::new(&chain, &[angle], DEFAULT_EPSILON).expect("one angle");
    let j = jacobian.matrix();
    let per_degree = 1.0_f64.to_radians();

    let expected_x = -angle.to_radians().sin() * per_degree;
    let expected_y = angle.to_radians().cos() * per_degree;
    assert!(((j[(0, 0)] - expected_x) / expected_x).abs() <= 1e-4);
    assert!(((j[(1, 0)] - expected_y) / expected_y).abs() <= 1e-4);
    assert_abs_diff_eq!(j[(2, 0)], 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(j[(3, 0)], 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(j[(4, 0)], 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(j[(5, 0)], 1.0, epsilon = 1e-4);
}
