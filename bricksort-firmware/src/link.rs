//! Control-side handle to an axis task
//!
//! [`AxisLink`] implements the core actuator trait by posting commands to
//! the axis task and, for awaited moves, suspending until the task reports
//! the move finished.

use defmt::*;

use bricksort_core::axis::Axis;
use bricksort_core::traits::{Actuator, Completion, StopMode};

use crate::channels::{axis_angle, slot, AxisCommand, AXIS_CMD, AXIS_DONE};

/// Actuator backed by an axis task
pub struct AxisLink {
    axis: Axis,
}

impl AxisLink {
    pub fn new(axis: Axis) -> Self {
        Self { axis }
    }

    fn post(&self, command: AxisCommand) {
        trace!("{} axis <- {:?}", self.axis.name(), command);
        AXIS_CMD[slot(self.axis)].signal(command);
    }

    /// Post a command and wait for the axis task to report completion
    async fn post_and_wait(&self, command: AxisCommand) -> i32 {
        let done = &AXIS_DONE[slot(self.axis)];
        // Drop any report left over from a detached move
        done.reset();
        self.post(command);
        done.wait().await
    }
}

impl Actuator for AxisLink {
    async fn run(&mut self, speed: i32) {
        self.post(AxisCommand::Run { speed });
    }

    async fn run_target(&mut self, speed: i32, target: i32, then: StopMode, completion: Completion) {
        let command = AxisCommand::RunTarget {
            speed,
            target,
            then,
        };
        match completion {
            Completion::Await => {
                self.post_and_wait(command).await;
            }
            Completion::Detach => self.post(command),
        }
    }

    async fn run_until_stalled(&mut self, speed: i32, then: StopMode, torque_pct: u8) -> i32 {
        let angle = self
            .post_and_wait(AxisCommand::Seek {
                speed,
                then,
                torque_pct,
            })
            .await;
        debug!("{} axis stalled at {}", self.axis.name(), angle);
        angle
    }

    fn angle(&self) -> i32 {
        axis_angle(self.axis)
    }

    async fn reset_angle(&mut self, angle: i32) {
        self.post_and_wait(AxisCommand::Reset { angle }).await;
    }

    async fn stop(&mut self) {
        self.post(AxisCommand::Stop);
    }
}
