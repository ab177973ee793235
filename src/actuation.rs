//! Boundary to the hardware that carries out a move.

use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::motion::MotionCommand;
use crate::utils::format_joints;

/// Consumes the interpolated sequence of a move and drives the joints.
///
/// The actuator owns any connection it needs. It reports a single success flag
/// per move; individual actuator faults are not visible to the chain.
pub trait Actuator {
    fn execute(&mut self, motion: &MotionCommand) -> bool;
}

/// Angle to PWM duty cycle mapping of a hobby servo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServoPwm {
    /// PWM frequency
    pub frequency_hz: f64,

    /// Pulse width at 0° servo angle
    pub min_pulse_ms: f64,

    /// Pulse width at 180° servo angle
    pub max_pulse_ms: f64,

    /// Added to the joint angle to obtain the servo angle.
    pub offset_deg: f64,
}

impl Default for ServoPwm {
    fn default() -> Self {
        ServoPwm { frequency_hz: 50.0, min_pulse_ms: 1.0, max_pulse_ms: 2.0, offset_deg: 90.0 }
    }
}

impl ServoPwm {
    /// Duty cycle in percent for the given joint angle (degrees).
    /// The servo angle is clamped to 0..180.
    pub fn duty_cycle(&self, angle: f64) -> f64 {
        let servo_angle = (angle + self.offset_deg).clamp(0.0, 180.0);
        let pulse_ms = self.min_pulse_ms + (self.max_pulse_ms - self.min_pulse_ms) * servo_angle / 180.0;
        let period_ms = 1000.0 / self.frequency_hz;
        pulse_ms / period_ms * 100.0
    }

    pub fn duty_cycles(&self, angles: &[f64]) -> Vec<f64> {
        angles.iter().map(|&angle| self.duty_cycle(angle)).collect()
    }
}

/// Actuator without hardware. Logs every element and always succeeds.
#[derive(Debug, Clone, Default)]
pub struct DryRunActuator {
    realtime: bool,
    servo: Option<ServoPwm>,
    moves: usize,
}

impl DryRunActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for the wait interval of every element, like real hardware would.
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Also log the duty cycles the servos would receive.
    pub fn with_servo(mut self, servo: ServoPwm) -> Self {
        self.servo = Some(servo);
        self
    }

    /// Number of moves executed so far.
    pub fn moves(&self) -> usize {
        self.moves
    }
}

impl Actuator for DryRunActuator {
    fn execute(&mut self, motion: &MotionCommand) -> bool {
        debug!("Dry run of {} steps over {:?}", motion.len(), motion.duration());
        for (k, step) in motion.iter().enumerate() {
            match &self.servo {
                Some(servo) => trace!(
                    "step {}: {} duty {}",
                    k,
                    format_joints(&step.angles),
                    format_joints(&servo.duty_cycles(&step.angles))
                ),
                None => trace!("step {}: {}", k, format_joints(&step.angles)),
            }
            if self.realtime && !step.wait.is_zero() {
                thread::sleep(step.wait);
            }
        }
        self.moves += 1;
        info!("Dry run reached {}", format_joints(motion.target()));
        true
    }
}
