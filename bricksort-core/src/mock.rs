//! Recording test doubles for the hardware traits

use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::string::{String, ToString};
use std::vec::Vec;

use crate::axis::Axis;
use crate::color::ColorLabel;
use crate::traits::{
    Actuator, Clock, ColorSensor, Completion, Display, DisplayError, LightColor, Rgb,
    SensorError, StatusLight, StopMode,
};

/// One recorded actuator call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Run(i32),
    RunTarget {
        speed: i32,
        target: i32,
        then: StopMode,
        completion: Completion,
    },
    RunUntilStalled {
        speed: i32,
        then: StopMode,
        torque_pct: u8,
    },
    ResetAngle(i32),
    Stop,
}

/// Shared, ordered log of calls across all mock actuators
#[derive(Default)]
pub struct CallLog(RefCell<Vec<(Axis, Call)>>);

impl CallLog {
    pub fn push(&self, axis: Axis, call: Call) {
        self.0.borrow_mut().push((axis, call));
    }

    pub fn all(&self) -> Vec<(Axis, Call)> {
        self.0.borrow().clone()
    }

    pub fn last(&self, axis: Axis) -> Option<Call> {
        self.0
            .borrow()
            .iter()
            .rev()
            .find(|(a, _)| *a == axis)
            .map(|(_, c)| *c)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Targeted moves only, as `(axis, target, completion)`
    pub fn targets(&self) -> Vec<(Axis, i32, Completion)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|(axis, call)| match call {
                Call::RunTarget {
                    target, completion, ..
                } => Some((*axis, *target, *completion)),
                _ => None,
            })
            .collect()
    }
}

/// Actuator that reaches every target instantly
pub struct MockActuator<'a> {
    axis: Axis,
    log: &'a CallLog,
    angle: Cell<i32>,
    velocity: Cell<i32>,
    stall_angle: i32,
}

impl<'a> MockActuator<'a> {
    pub fn new(axis: Axis, log: &'a CallLog) -> Self {
        Self {
            axis,
            log,
            angle: Cell::new(0),
            velocity: Cell::new(0),
            stall_angle: -7,
        }
    }

    pub fn set_angle(&self, angle: i32) {
        self.angle.set(angle);
    }

    /// Integrate the last commanded velocity by `step` degrees
    pub fn advance(&self, step: i32) {
        let direction = self.velocity.get().signum();
        self.angle.set(self.angle.get() + direction * step);
    }
}

impl Actuator for MockActuator<'_> {
    async fn run(&mut self, speed: i32) {
        self.velocity.set(speed);
        self.log.push(self.axis, Call::Run(speed));
    }

    async fn run_target(&mut self, speed: i32, target: i32, then: StopMode, completion: Completion) {
        self.velocity.set(0);
        self.angle.set(target);
        self.log.push(
            self.axis,
            Call::RunTarget {
                speed,
                target,
                then,
                completion,
            },
        );
    }

    async fn run_until_stalled(&mut self, speed: i32, then: StopMode, torque_pct: u8) -> i32 {
        self.velocity.set(0);
        self.angle.set(self.stall_angle);
        self.log.push(
            self.axis,
            Call::RunUntilStalled {
                speed,
                then,
                torque_pct,
            },
        );
        self.stall_angle
    }

    fn angle(&self) -> i32 {
        self.angle.get()
    }

    async fn reset_angle(&mut self, angle: i32) {
        self.angle.set(angle);
        self.log.push(self.axis, Call::ResetAngle(angle));
    }

    async fn stop(&mut self) {
        self.velocity.set(0);
        self.log.push(self.axis, Call::Stop);
    }
}

/// Color sensor that replays queued samples, then repeats the fallback
pub struct MockSensor {
    queue: VecDeque<Rgb>,
    fallback: Rgb,
    pub reads: usize,
    /// Report a bus error on every read
    pub fail: bool,
}

impl MockSensor {
    pub fn new(fallback: Rgb) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback,
            reads: 0,
            fail: false,
        }
    }

    pub fn queue(&mut self, sample: Rgb) {
        self.queue.push_back(sample);
    }

    pub fn set_fallback(&mut self, sample: Rgb) {
        self.fallback = sample;
    }
}

impl ColorSensor for MockSensor {
    async fn rgb(&mut self) -> Result<Rgb, SensorError> {
        self.reads += 1;
        if self.fail {
            return Err(SensorError::Bus);
        }
        Ok(self.queue.pop_front().unwrap_or(self.fallback))
    }
}

/// Display that records what is shown
#[derive(Default)]
pub struct MockDisplay {
    pub lines: Vec<String>,
    pub images: Vec<ColorLabel>,
    pub clears: usize,
    /// Report a bus error on every operation
    pub fail: bool,
}

impl MockDisplay {
    /// Display whose bus is down
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), DisplayError> {
        if self.fail {
            Err(DisplayError::Bus)
        } else {
            Ok(())
        }
    }

    pub fn shows(&self, text: &str) -> bool {
        self.lines.iter().any(|l| l.contains(text))
    }
}

impl Display for MockDisplay {
    async fn clear(&mut self) -> Result<(), DisplayError> {
        self.check()?;
        self.clears += 1;
        self.lines.clear();
        Ok(())
    }

    async fn print(&mut self, line: &str) -> Result<(), DisplayError> {
        self.check()?;
        self.lines.push(line.to_string());
        Ok(())
    }

    async fn load_image(&mut self, image: ColorLabel) -> Result<(), DisplayError> {
        self.check()?;
        self.images.push(image);
        Ok(())
    }
}

/// Status light that keeps its history
#[derive(Default)]
pub struct MockLight {
    pub history: Vec<LightColor>,
}

impl StatusLight for MockLight {
    fn set(&mut self, color: LightColor) {
        self.history.push(color);
    }
}

/// Manually advanced clock; delays move time forward
#[derive(Default)]
pub struct MockClock {
    pub now: u32,
    pub delays: Vec<u32>,
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.now
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        self.now = self.now.wrapping_add(ms);
    }
}
