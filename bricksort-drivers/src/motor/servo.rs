//! Closed-loop position servo for encoder DC motors
//!
//! This driver provides:
//! - Constant-speed runs driven by a moving setpoint
//! - Absolute moves that stop at the target and optionally hold it
//! - Torque-limited stall seeking for homing against hard stops
//! - Minimum duty handling (below which the motor won't turn)
//!
//! # Usage
//!
//! The driver is pure logic. Call `update()` periodically with the encoder
//! angle; it returns the signed duty cycle to apply to the H-bridge.
//!
//! ```ignore
//! let mut servo = ServoMotor::new(ServoConfig::default());
//! servo.run_target(550, 360, StopMode::Hold, encoder.angle());
//!
//! // Every millisecond:
//! let duty = servo.update(encoder.angle(), 1);
//! bridge.apply(duty);
//! ```

use bricksort_core::traits::StopMode;

/// Servo tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoConfig {
    /// Proportional gain in duty percent ×10 per degree of error
    pub kp_x10: i32,
    /// Speed feedforward in duty percent per 100 deg/s
    pub feedforward_pct: i32,
    /// Minimum duty cycle percentage (below this the motor won't turn)
    pub min_duty: u8,
    /// Maximum duty cycle percentage
    pub max_duty: u8,
    /// Arrival window around a target in degrees
    pub tolerance_deg: i32,
    /// Furthest the setpoint may run ahead of the shaft in degrees
    pub max_lag_deg: i32,
    /// Time without progress that counts as a stall
    pub stall_window_ms: u32,
    /// Progress that resets the stall window in degrees
    pub stall_progress_deg: i32,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            kp_x10: 40,
            feedforward_pct: 12,
            min_duty: 15,
            max_duty: 100,
            tolerance_deg: 2,
            max_lag_deg: 30,
            stall_window_ms: 200,
            stall_progress_deg: 2,
        }
    }
}

/// Servo control state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoState {
    /// Output released
    Idle,
    /// Constant-speed run with no end point
    Running { speed: i32 },
    /// Travelling to an absolute target
    Tracking { speed: i32, target: i32, then: StopMode },
    /// Pushing toward a hard stop with a torque limit
    Seeking { speed: i32, limit: u8, then: StopMode },
    /// Actively holding a position
    Holding { angle: i32 },
}

/// Closed-loop servo driver state
pub struct ServoMotor {
    config: ServoConfig,
    state: ServoState,
    /// Commanded position in millidegrees
    setpoint_mdeg: i64,
    /// Set when the last target or stop was reached
    settled: bool,
    stall_ref: i32,
    stall_ms: u32,
    stall_angle: Option<i32>,
}

impl ServoMotor {
    /// Create a new servo driver with the output released
    pub fn new(config: ServoConfig) -> Self {
        Self {
            config,
            state: ServoState::Idle,
            setpoint_mdeg: 0,
            settled: true,
            stall_ref: 0,
            stall_ms: 0,
            stall_angle: None,
        }
    }

    /// Get the current control state
    pub fn state(&self) -> ServoState {
        self.state
    }

    /// Get the configuration
    pub fn config(&self) -> &ServoConfig {
        &self.config
    }

    /// Check if the last move or seek has finished
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Angle at which the last seek stalled
    pub fn stall_angle(&self) -> Option<i32> {
        self.stall_angle
    }

    /// Run at constant speed until told otherwise
    pub fn run(&mut self, speed: i32, angle: i32) {
        self.setpoint_mdeg = mdeg(angle);
        self.state = ServoState::Running { speed };
        self.settled = true;
    }

    /// Move to an absolute angle
    pub fn run_target(&mut self, speed: i32, target: i32, then: StopMode, angle: i32) {
        self.setpoint_mdeg = mdeg(angle);
        self.state = ServoState::Tracking {
            speed: speed.abs(),
            target,
            then,
        };
        self.settled = false;
    }

    /// Drive toward a hard stop until the stall window expires
    pub fn run_until_stalled(&mut self, speed: i32, then: StopMode, torque_pct: u8, angle: i32) {
        self.setpoint_mdeg = mdeg(angle);
        self.state = ServoState::Seeking {
            speed,
            limit: torque_pct.min(self.config.max_duty),
            then,
        };
        self.settled = false;
        self.stall_ref = angle;
        self.stall_ms = 0;
        self.stall_angle = None;
    }

    /// Release the output
    pub fn stop(&mut self) {
        self.state = ServoState::Idle;
        self.settled = true;
    }

    /// Redefine the setpoint after the encoder was re-zeroed
    pub fn rebase(&mut self, angle: i32) {
        self.setpoint_mdeg = mdeg(angle);
        if let ServoState::Holding { .. } = self.state {
            self.state = ServoState::Holding { angle };
        }
    }

    /// Advance the controller by `delta_ms` at the measured `angle`
    ///
    /// Returns the signed duty cycle (-100..=100) to apply.
    pub fn update(&mut self, angle: i32, delta_ms: u32) -> i16 {
        match self.state {
            ServoState::Idle => 0,
            ServoState::Running { speed } => {
                self.advance_setpoint(speed, angle, delta_ms);
                self.drive(angle, speed, self.config.max_duty)
            }
            ServoState::Tracking {
                speed,
                target,
                then,
            } => {
                let target_mdeg = mdeg(target);
                let toward = if target_mdeg >= self.setpoint_mdeg {
                    speed
                } else {
                    -speed
                };
                self.advance_setpoint(toward, angle, delta_ms);
                // Never overshoot the target with the setpoint
                if (toward >= 0 && self.setpoint_mdeg > target_mdeg)
                    || (toward < 0 && self.setpoint_mdeg < target_mdeg)
                {
                    self.setpoint_mdeg = target_mdeg;
                }

                if self.setpoint_mdeg == target_mdeg
                    && (angle - target).abs() <= self.config.tolerance_deg
                {
                    self.finish(then, target);
                    return self.update_settled(angle);
                }
                let feedforward = if self.setpoint_mdeg == target_mdeg {
                    0
                } else {
                    toward
                };
                self.drive(angle, feedforward, self.config.max_duty)
            }
            ServoState::Seeking { speed, limit, then } => {
                if (angle - self.stall_ref).abs() >= self.config.stall_progress_deg {
                    self.stall_ref = angle;
                    self.stall_ms = 0;
                } else {
                    self.stall_ms += delta_ms;
                }

                if self.stall_ms >= self.config.stall_window_ms {
                    self.stall_angle = Some(angle);
                    self.setpoint_mdeg = mdeg(angle);
                    self.finish(then, angle);
                    return self.update_settled(angle);
                }

                self.advance_setpoint(speed, angle, delta_ms);
                self.drive(angle, speed, limit)
            }
            ServoState::Holding { .. } => self.drive(angle, 0, self.config.max_duty),
        }
    }

    fn update_settled(&mut self, angle: i32) -> i16 {
        match self.state {
            ServoState::Holding { .. } => self.drive(angle, 0, self.config.max_duty),
            _ => 0,
        }
    }

    fn finish(&mut self, then: StopMode, angle: i32) {
        self.settled = true;
        self.state = match then {
            StopMode::Hold => ServoState::Holding { angle },
            // A PWM/DIR bridge cannot short the windings, so brake releases too
            StopMode::Brake | StopMode::Coast => ServoState::Idle,
        };
    }

    fn advance_setpoint(&mut self, speed: i32, angle: i32, delta_ms: u32) {
        // deg/s × ms = millidegrees
        self.setpoint_mdeg += speed as i64 * delta_ms as i64;

        let lag = mdeg(self.config.max_lag_deg);
        let shaft = mdeg(angle);
        self.setpoint_mdeg = self.setpoint_mdeg.clamp(shaft - lag, shaft + lag);
    }

    fn drive(&self, angle: i32, feedforward_speed: i32, limit: u8) -> i16 {
        let error_mdeg = self.setpoint_mdeg - mdeg(angle);
        let p = error_mdeg * self.config.kp_x10 as i64 / 10_000;
        let ff = feedforward_speed as i64 * self.config.feedforward_pct as i64 / 100;
        let raw = (p + ff).clamp(-100, 100) as i32;

        let magnitude = self.scale_duty(raw.unsigned_abs() as u8).min(limit);
        if raw < 0 {
            -(magnitude as i16)
        } else {
            magnitude as i16
        }
    }

    /// Scale the demand percentage to actual duty cycle
    ///
    /// Maps 1-100% onto min_duty-max_duty so small demands still move the
    /// motor; 0% stays off.
    fn scale_duty(&self, demand: u8) -> u8 {
        if demand == 0 {
            0
        } else {
            let min = self.config.min_duty as u32;
            let range = (self.config.max_duty as u32).saturating_sub(min);
            let scaled = min + (demand.min(100) as u32 * range / 100);
            scaled.min(100) as u8
        }
    }
}

fn mdeg(deg: i32) -> i64 {
    deg as i64 * 1000
}
