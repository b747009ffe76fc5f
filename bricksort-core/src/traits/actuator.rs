//! Linear actuator trait
//!
//! One actuator drives one gantry axis. Angles are motor degrees measured
//! from the reference set by the last [`Actuator::reset_angle`] call.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the motor does once a targeted move or stall run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopMode {
    /// Let the motor spin down freely
    Coast,
    /// Short the windings, no position hold
    Brake,
    /// Actively hold the final position
    #[default]
    Hold,
}

/// Whether a command suspends the caller until the motion finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Completion {
    /// Suspend until the axis reports arrival
    Await,
    /// Issue the command and return immediately
    Detach,
}

impl Completion {
    /// Check if the caller waits for the motion
    pub fn is_blocking(self) -> bool {
        matches!(self, Completion::Await)
    }
}

/// Trait for a position-controlled actuator
///
/// Speeds are signed degrees per second; the sign selects the direction
/// for [`Actuator::run`] and [`Actuator::run_until_stalled`] and is ignored
/// by [`Actuator::run_target`].
pub trait Actuator {
    /// Run continuously at the given signed speed until told otherwise
    async fn run(&mut self, speed: i32);

    /// Move to an absolute angle
    ///
    /// With [`Completion::Await`] this returns once the target is reached;
    /// with [`Completion::Detach`] it returns as soon as the command is
    /// accepted and the motion continues in the background.
    async fn run_target(&mut self, speed: i32, target: i32, then: StopMode, completion: Completion);

    /// Run until the load exceeds `torque_pct` percent of maximum torque
    ///
    /// Returns the angle at which the actuator stalled.
    async fn run_until_stalled(&mut self, speed: i32, then: StopMode, torque_pct: u8) -> i32;

    /// Current angle in degrees
    fn angle(&self) -> i32;

    /// Redefine the current physical position as `angle`
    async fn reset_angle(&mut self, angle: i32);

    /// Stop any motion and let the motor coast
    async fn stop(&mut self);
}
