use std::time::Duration;

use tracing::{debug, info, warn};

use crate::actuation::Actuator;
use crate::constraints::Constraints;
use crate::ik_solver::{IkConfig, IkResult, IkSolver, IkTarget};
use crate::kinematic_traits::{Joints, Kinematics, Pose, Transform};
use crate::kinematics_error::{ConfigurationError, KinematicsError, LimitViolation};
use crate::motion::MotionCommand;
use crate::parameters::JointSpec;
use crate::utils::format_joints;

/// Serial chain of rotational joints described by DH parameters.
///
/// The joint specifications never change after construction. The only mutable
/// state is the current joint angle vector: the last configuration that was
/// successfully commanded. One move at a time; concurrent moves on the same
/// chain must be serialized by the caller.
#[derive(Debug, Clone)]
pub struct ChainModel {
    joints: Vec<JointSpec>,
    constraints: Constraints,
    current: Joints,
}

impl ChainModel {
    /// Creates the chain resting at the angle closest to zero inside each joint's limits.
    pub fn new(joints: Vec<JointSpec>) -> Result<Self, ConfigurationError> {
        if joints.is_empty() {
            return Err(ConfigurationError::EmptyChain);
        }
        for (i, joint) in joints.iter().enumerate() {
            joint.validate(i)?;
        }
        let constraints = Constraints::from_joints(&joints)?;
        let current = constraints.rest_position();
        Ok(ChainModel { joints, constraints, current })
    }

    /// Creates the chain with the given current angles, which must be within limits.
    pub fn with_angles(joints: Vec<JointSpec>, angles: &[f64]) -> Result<Self, KinematicsError> {
        let mut chain = Self::new(joints)?;
        chain.validate(angles)?;
        chain.current = angles.to_vec();
        Ok(chain)
    }

    pub fn dof(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &[JointSpec] {
        &self.joints
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Angles of the last successfully commanded configuration, degrees.
    pub fn current_angles(&self) -> &[f64] {
        &self.current
    }

    fn check_count(&self, angles: &[f64]) -> Result<(), ConfigurationError> {
        if angles.len() != self.dof() {
            return Err(ConfigurationError::JointCountMismatch { expected: self.dof(), found: angles.len() });
        }
        Ok(())
    }

    /// Base to end-effector transform for the given angles (degrees).
    /// The first joint is leftmost in the product.
    pub fn forward_kinematics(&self, angles: &[f64]) -> Result<Transform, KinematicsError> {
        self.check_count(angles)?;
        Ok(self.forward(angles))
    }

    pub fn end_effector_pose(&self, angles: &[f64]) -> Result<Pose, KinematicsError> {
        self.check_count(angles)?;
        Ok(self.pose(angles))
    }

    pub fn current_pose(&self) -> Pose {
        self.pose(&self.current)
    }

    /// Origins of all cumulative joint frames, base first. Element `i` is the
    /// translation of the base to joint `i` frame, the last one is the end-effector.
    pub fn link_positions(&self, angles: &[f64]) -> Result<Vec<[f64; 3]>, KinematicsError> {
        self.check_count(angles)?;
        let mut t = Transform::identity();
        let mut positions = Vec::with_capacity(self.dof() + 1);
        positions.push([0.0, 0.0, 0.0]);
        for (joint, &angle) in self.joints.iter().zip(angles) {
            t *= joint.transform(angle);
            positions.push([t[(0, 3)], t[(1, 3)], t[(2, 3)]]);
        }
        Ok(positions)
    }

    /// Joint limit check only. Reports the first offending joint, never applies anything.
    pub fn check_limits(&self, angles: &[f64]) -> Result<(), LimitViolation> {
        self.constraints.check(angles)
    }

    /// Joint count and limit validation. Either every angle is acceptable or the vector is refused.
    pub fn validate(&self, angles: &[f64]) -> Result<(), KinematicsError> {
        self.check_count(angles)?;
        self.check_limits(angles)?;
        Ok(())
    }

    /// Clamps every angle into its joint's limits.
    pub fn clamp(&self, angles: &mut [f64]) {
        self.constraints.clamp(angles);
    }

    /// Solves for a target pose starting from the current angles. The orientation
    /// defaults to [0, 0, 0] when not given.
    pub fn inverse_kinematics(&self, position: [f64; 3], orientation: Option<[f64; 3]>, config: &IkConfig) -> IkResult {
        self.solve(&IkTarget::pose(position, orientation), config)
    }

    /// Solves for any [`IkTarget`] starting from the current angles.
    pub fn solve(&self, target: &IkTarget, config: &IkConfig) -> IkResult {
        IkSolver::new(config.clone()).solve_from_valid_seed(self, target, self.current.clone())
    }

    /// Validates the target and builds the interpolated motion from the current angles.
    /// Nothing is produced if validation fails.
    pub fn plan_move(&self, target: &[f64], duration: Duration) -> Result<MotionCommand, KinematicsError> {
        if let Err(err) = self.validate(target) {
            warn!("Refusing move to {}: {}", format_joints(target), err);
            return Err(err);
        }
        Ok(MotionCommand::new(self.current.clone(), target.to_vec(), duration))
    }

    /// Moves to the given joint angles. The current angles are only updated if
    /// the actuator reports success; on any failure the chain state is unchanged.
    pub fn move_to_angles(
        &mut self,
        target: &[f64],
        duration: Duration,
        actuator: &mut impl Actuator,
    ) -> Result<(), KinematicsError> {
        let motion = self.plan_move(target, duration)?;
        debug!(
            "Moving {} -> {} in {} steps",
            format_joints(motion.start()),
            format_joints(motion.target()),
            motion.steps()
        );
        if !actuator.execute(&motion) {
            warn!("Actuator failed to move to {}", format_joints(target));
            return Err(KinematicsError::ActuationFailed);
        }
        self.current = target.to_vec();
        info!("Moved to {}", format_joints(&self.current));
        Ok(())
    }

    /// Moves a single joint, all others keep their current angles.
    pub fn move_joint(
        &mut self,
        joint: usize,
        angle: f64,
        duration: Duration,
        actuator: &mut impl Actuator,
    ) -> Result<(), KinematicsError> {
        if joint >= self.dof() {
            return Err(ConfigurationError::NoSuchJoint { joint, dof: self.dof() }.into());
        }
        let mut target = self.current.clone();
        target[joint] = angle;
        self.move_to_angles(&target, duration, actuator)
    }

    /// Moves to the rest position, each joint at the angle closest to zero within its limits.
    pub fn move_home(&mut self, duration: Duration, actuator: &mut impl Actuator) -> Result<(), KinematicsError> {
        let home = self.constraints.rest_position();
        self.move_to_angles(&home, duration, actuator)
    }

    /// Solves for the target and moves there. The chain does not move unless the solver converged.
    pub fn move_to_pose(
        &mut self,
        target: &IkTarget,
        config: &IkConfig,
        duration: Duration,
        actuator: &mut impl Actuator,
    ) -> Result<IkResult, KinematicsError> {
        let result = self.solve(target, config);
        if let Some(err) = result.failure() {
            warn!("Could not reach target {:?}: {}", target, err);
            return Err(err);
        }
        self.move_to_angles(&result.angles, duration, actuator)?;
        Ok(result)
    }
}

impl Kinematics for ChainModel {
    fn dof(&self) -> usize {
        self.joints.len()
    }

    fn forward(&self, angles: &[f64]) -> Transform {
        self.joints
            .iter()
            .zip(angles)
            .fold(Transform::identity(), |t, (joint, &angle)| t * joint.transform(angle))
    }
}
