//! Bounded single-axis controller
//!
//! Wraps one actuator with a travel window. Jogging stops silently at the
//! window edges and absolute targets are clamped into it, so no caller can
//! drive the carriage past its recorded bounds.

use crate::traits::{Actuator, ButtonSet, Button, Completion, StopMode};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gantry axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// Horizontal, across the bin rows
    X,
    /// Horizontal, along the bin columns
    Y,
    /// Vertical gripper lift (0 is the top)
    Z,
}

impl Axis {
    /// All axes
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Short name for logs and the status screen
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Jog direction along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JogDirection {
    /// Toward `max_angle`
    Positive,
    /// Toward `min_angle`
    Negative,
}

impl JogDirection {
    /// Resolve a key pair into a direction
    ///
    /// Returns `None` when neither or both keys are held.
    pub fn from_buttons(buttons: ButtonSet, positive: Button, negative: Button) -> Option<Self> {
        if buttons.only_one_of(positive, negative) {
            Some(JogDirection::Positive)
        } else if buttons.only_one_of(negative, positive) {
            Some(JogDirection::Negative)
        } else {
            None
        }
    }

    /// Apply this direction to an unsigned speed
    pub fn apply(self, speed: i32) -> i32 {
        match self {
            JogDirection::Positive => speed.abs(),
            JogDirection::Negative => -speed.abs(),
        }
    }
}

/// Travel window and speeds for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisConfig {
    /// Lowest allowed angle in degrees
    pub min_angle: i32,
    /// Highest allowed angle in degrees
    pub max_angle: i32,
    /// Manual jog speed in deg/s
    pub jog_speed: i32,
    /// Routine move speed in deg/s (also used for stall seeking)
    pub move_speed: i32,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            min_angle: 0,
            max_angle: 1000,
            jog_speed: 200,
            move_speed: 550,
        }
    }
}

impl AxisConfig {
    /// Check if an angle is inside the travel window
    pub fn contains(&self, angle: i32) -> bool {
        angle >= self.min_angle && angle <= self.max_angle
    }

    /// Clamp an angle into the travel window
    pub fn clamp(&self, angle: i32) -> i32 {
        angle.clamp(self.min_angle, self.max_angle)
    }
}

/// Controller for one bounded axis
pub struct AxisController<A> {
    axis: Axis,
    actuator: A,
    config: AxisConfig,
}

impl<A: Actuator> AxisController<A> {
    /// Take ownership of an actuator for `axis`
    pub fn new(axis: Axis, actuator: A, config: AxisConfig) -> Self {
        Self {
            axis,
            actuator,
            config,
        }
    }

    /// Axis this controller drives
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Travel window and speeds
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    /// Current actuator angle
    pub fn angle(&self) -> i32 {
        self.actuator.angle()
    }

    /// Borrow the underlying actuator
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// One jog tick
    ///
    /// Runs at jog speed only while the angle is strictly inside the bound
    /// on the side of travel; otherwise stops.
    pub async fn jog(&mut self, direction: Option<JogDirection>) {
        let angle = self.actuator.angle();
        match direction {
            Some(JogDirection::Positive) if angle < self.config.max_angle => {
                self.actuator.run(self.config.jog_speed).await;
            }
            Some(JogDirection::Negative) if angle > self.config.min_angle => {
                self.actuator.run(-self.config.jog_speed).await;
            }
            _ => self.actuator.stop().await,
        }
    }

    /// Move to an absolute angle at the configured move speed
    ///
    /// Returns the target actually commanded after clamping.
    pub async fn move_to(&mut self, target: i32, completion: Completion) -> i32 {
        self.move_to_at(self.config.move_speed, target, completion).await
    }

    /// Move to an absolute angle at an explicit speed
    pub async fn move_to_at(&mut self, speed: i32, target: i32, completion: Completion) -> i32 {
        let target = self.config.clamp(target);
        self.actuator
            .run_target(speed, target, StopMode::Hold, completion)
            .await;
        target
    }

    /// Drive toward a hard stop until the torque limit trips, then hold
    pub async fn run_until_stalled(&mut self, direction: JogDirection, torque_pct: u8) -> i32 {
        let speed = direction.apply(self.config.move_speed);
        self.actuator
            .run_until_stalled(speed, StopMode::Hold, torque_pct)
            .await
    }

    /// Redefine the current position as `angle`
    pub async fn reset_reference(&mut self, angle: i32) {
        self.actuator.reset_angle(angle).await;
    }

    /// Stop any running motion
    pub async fn halt(&mut self) {
        self.actuator.stop().await;
    }
}

/// The three gantry axes
pub struct Axes<A> {
    pub x: AxisController<A>,
    pub y: AxisController<A>,
    pub z: AxisController<A>,
}

impl<A: Actuator> Axes<A> {
    /// Build the gantry from one actuator and config per axis
    pub fn new(x: (A, AxisConfig), y: (A, AxisConfig), z: (A, AxisConfig)) -> Self {
        Self {
            x: AxisController::new(Axis::X, x.0, x.1),
            y: AxisController::new(Axis::Y, y.0, y.1),
            z: AxisController::new(Axis::Z, z.0, z.1),
        }
    }

    /// Controller for an axis
    pub fn get(&self, axis: Axis) -> &AxisController<A> {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Mutable controller for an axis
    pub fn get_mut(&mut self, axis: Axis) -> &mut AxisController<A> {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Stop all three axes
    pub async fn halt_all(&mut self) {
        for axis in Axis::ALL {
            self.get_mut(axis).halt().await;
        }
    }
}
