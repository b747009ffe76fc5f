//! Axis servo task
//!
//! Receives commands from the control task and closes the position loop
//! for one encoder DC motor. Uses the bricksort_drivers::motor::ServoMotor
//! driver; duty is applied as PWM magnitude plus a direction pin.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::{Duration, Ticker};
use portable_atomic::Ordering;

use bricksort_core::axis::Axis;
use bricksort_drivers::motor::{ServoConfig, ServoMotor};

use crate::channels::{slot, AxisCommand, AXIS_ANGLE, AXIS_CMD, AXIS_DONE, ENCODER_DEGREES};

/// Servo loop period
const UPDATE_MS: u32 = 1;

/// Per-axis drive settings
#[derive(Debug, Clone, Copy)]
pub struct AxisDriveConfig {
    pub servo: ServoConfig,
    /// PWM top value (determines frequency)
    pub pwm_top: u16,
    /// Swap the direction pin polarity
    pub reversed: bool,
}

impl Default for AxisDriveConfig {
    fn default() -> Self {
        Self {
            servo: ServoConfig::default(),
            pwm_top: 6250, // 125 MHz / 6250 = 20 kHz
            reversed: false,
        }
    }
}

/// What the axis task owes the control task once the servo settles
#[derive(Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    Arrival,
    Stall,
}

/// Servo task for one gantry axis
#[embassy_executor::task(pool_size = 3)]
pub async fn axis_task(
    axis: Axis,
    mut pwm: Pwm<'static>,
    mut dir_pin: Output<'static>,
    config: AxisDriveConfig,
) {
    info!("{} axis task started", axis.name());

    let index = slot(axis);
    let mut servo = ServoMotor::new(config.servo);

    let mut pwm_config = PwmConfig::default();
    pwm_config.top = config.pwm_top;
    pwm_config.compare_a = 0;
    pwm.set_config(&pwm_config);

    // Calibrated angle = encoder angle + offset
    let mut offset: i32 = 0;
    let mut pending = Pending::None;
    let mut ticker = Ticker::every(Duration::from_millis(UPDATE_MS as u64));

    loop {
        let angle = ENCODER_DEGREES[index].load(Ordering::Relaxed) + offset;

        if let Some(command) = AXIS_CMD[index].try_take() {
            trace!("{} axis command: {:?}", axis.name(), command);
            pending = Pending::None;
            match command {
                AxisCommand::Run { speed } => servo.run(speed, angle),
                AxisCommand::RunTarget {
                    speed,
                    target,
                    then,
                } => {
                    servo.run_target(speed, target, then, angle);
                    pending = Pending::Arrival;
                }
                AxisCommand::Seek {
                    speed,
                    then,
                    torque_pct,
                } => {
                    servo.run_until_stalled(speed, then, torque_pct, angle);
                    pending = Pending::Stall;
                }
                AxisCommand::Reset { angle: new_angle } => {
                    offset += new_angle - angle;
                    servo.rebase(new_angle);
                    AXIS_ANGLE[index].store(new_angle, Ordering::Relaxed);
                    debug!("{} axis zeroed at {}", axis.name(), new_angle);
                    AXIS_DONE[index].signal(new_angle);
                }
                AxisCommand::Stop => servo.stop(),
            }
        }

        let angle = ENCODER_DEGREES[index].load(Ordering::Relaxed) + offset;
        AXIS_ANGLE[index].store(angle, Ordering::Relaxed);

        let duty = servo.update(angle, UPDATE_MS);

        if pending != Pending::None && servo.is_settled() {
            let reported = match pending {
                Pending::Stall => servo.stall_angle().unwrap_or(angle),
                _ => angle,
            };
            pending = Pending::None;
            AXIS_DONE[index].signal(reported);
        }

        // Apply duty cycle to PWM
        let forward = (duty >= 0) != config.reversed;
        dir_pin.set_level(forward.into());
        pwm_config.compare_a = (duty.unsigned_abs() as u32 * config.pwm_top as u32 / 100) as u16;
        pwm.set_config(&pwm_config);

        ticker.next().await;
    }
}
