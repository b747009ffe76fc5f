//! Routine plans
//!
//! A routine is an ordered list of axis steps. Every move is tagged with
//! its [`Completion`]: `Await` steps are suspension points where the flow
//! waits for arrival, `Detach` steps are issued and left running while the
//! next step starts. The tag lives in the plan, so the scheduling of a
//! routine can be checked without any hardware.

use heapless::Vec;

use super::position::{Layout, Position};
use crate::axis::{Axis, JogDirection};
use crate::color::ColorLabel;
use crate::traits::Completion;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of steps in one routine
pub const MAX_PLAN_STEPS: usize = 24;

/// Absolute move of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveStep {
    pub axis: Axis,
    pub target: i32,
    /// Explicit speed, or `None` for the axis' configured move speed
    pub speed: Option<i32>,
    pub completion: Completion,
}

/// One step of a routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Move an axis to an absolute angle
    Move(MoveStep),
    /// Drive an axis into its hard stop until the torque limit trips
    SeekStop {
        axis: Axis,
        direction: JogDirection,
        torque_pct: u8,
    },
    /// Redefine an axis' current position
    Rezero { axis: Axis, angle: i32 },
}

impl Step {
    /// Check if the flow waits for this step before continuing
    pub fn is_blocking(&self) -> bool {
        match self {
            Step::Move(m) => m.completion.is_blocking(),
            Step::SeekStop { .. } | Step::Rezero { .. } => true,
        }
    }
}

/// Errors building a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlanError {
    /// Routine does not fit in [`MAX_PLAN_STEPS`]
    TooManySteps,
}

/// Ordered list of routine steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    steps: Vec<Step, MAX_PLAN_STEPS>,
}

impl Plan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the plan has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append a step
    pub fn push(&mut self, step: Step) -> Result<&mut Self, PlanError> {
        self.steps.push(step).map_err(|_| PlanError::TooManySteps)?;
        Ok(self)
    }

    /// Append a move of one axis at its configured speed
    pub fn axis(&mut self, axis: Axis, target: i32, completion: Completion) -> Result<&mut Self, PlanError> {
        self.push(Step::Move(MoveStep {
            axis,
            target,
            speed: None,
            completion,
        }))
    }

    /// Append a move of one axis at an explicit speed
    pub fn axis_at(
        &mut self,
        axis: Axis,
        speed: i32,
        target: i32,
        completion: Completion,
    ) -> Result<&mut Self, PlanError> {
        self.push(Step::Move(MoveStep {
            axis,
            target,
            speed: Some(speed),
            completion,
        }))
    }

    /// Append an X move followed by a Y move
    pub fn position(&mut self, position: Position, x: Completion, y: Completion) -> Result<&mut Self, PlanError> {
        self.axis(Axis::X, position.x, x)?.axis(Axis::Y, position.y, y)
    }

    /// Append an X then Y move, both awaited
    pub fn position_blocking(&mut self, position: Position) -> Result<&mut Self, PlanError> {
        self.position(position, Completion::Await, Completion::Await)
    }

    /// Largest number of moves in flight at any point of the plan
    ///
    /// Detached moves stay in flight until the next blocking step finishes.
    pub fn max_overlap(&self) -> usize {
        let mut in_flight = 0;
        let mut max = 0;
        for step in self.steps() {
            in_flight += 1;
            max = max.max(in_flight);
            if step.is_blocking() {
                in_flight = 0;
            }
        }
        max
    }
}

/// Calibration tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationConfig {
    /// Torque limit for hard-stop detection (percent of maximum)
    pub stall_torque_pct: u8,
    /// Speed of the back-off moves after zeroing (deg/s)
    pub offset_speed: i32,
    /// Back-off distance from the X hard stop
    pub x_offset: i32,
    /// Back-off distance from the Y hard stop
    pub y_offset: i32,
    /// Back-off distance from the Z hard stop
    pub z_offset: i32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            stall_torque_pct: 40,
            offset_speed: 550,
            x_offset: 50,
            y_offset: 55,
            z_offset: 20,
        }
    }
}

/// Order in which axes are driven into their stops (lift clear first)
pub const CALIBRATION_ORDER: [Axis; 3] = [Axis::Z, Axis::X, Axis::Y];

/// Builds the fixed routines from the layout
pub struct RoutinePlanner<'a> {
    layout: &'a Layout,
    calibration: &'a CalibrationConfig,
}

impl<'a> RoutinePlanner<'a> {
    /// Create a planner over a layout and calibration tuning
    pub fn new(layout: &'a Layout, calibration: &'a CalibrationConfig) -> Self {
        Self {
            layout,
            calibration,
        }
    }

    /// Find the hard stops and zero every axis slightly off them
    pub fn calibrate(&self) -> Result<Plan, PlanError> {
        let cal = self.calibration;
        let mut plan = Plan::new();

        for axis in CALIBRATION_ORDER {
            plan.push(Step::SeekStop {
                axis,
                direction: JogDirection::Negative,
                torque_pct: cal.stall_torque_pct,
            })?
            .push(Step::Rezero { axis, angle: 0 })?;
        }

        // Back off the stops; Z and X run while Y is awaited
        plan.axis_at(Axis::Z, cal.offset_speed, cal.z_offset, Completion::Detach)?
            .axis_at(Axis::X, cal.offset_speed, cal.x_offset, Completion::Detach)?
            .axis_at(Axis::Y, cal.offset_speed, cal.y_offset, Completion::Await)?;

        for axis in CALIBRATION_ORDER {
            plan.push(Step::Rezero { axis, angle: 0 })?;
        }

        Ok(plan)
    }

    /// Carry a brick from the pick-up point into a color's bin
    pub fn store(&self, label: ColorLabel) -> Result<Plan, PlanError> {
        let layout = self.layout;
        let path = layout.path(label);
        let mut plan = Plan::new();

        plan.axis(Axis::Z, layout.z_top, Completion::Await)?
            // X must be in place before the grab; Y may still be trailing
            .position(layout.pick_up, Completion::Await, Completion::Detach)?
            .axis(Axis::Z, layout.grab_depth, Completion::Await)?
            .position_blocking(path.hallway)?
            .position_blocking(path.bin)?
            // Release: lift clear, then back out to the aisle
            .axis(Axis::Z, layout.z_top, Completion::Await)?
            .axis(Axis::X, path.hallway.x, Completion::Await)?
            .position_blocking(layout.drop_off)?
            .position(layout.standby, Completion::Detach, Completion::Await)?;

        Ok(plan)
    }

    /// Fetch a color's brick and bring it to the drop-off point
    pub fn retrieve(&self, label: ColorLabel) -> Result<Plan, PlanError> {
        let layout = self.layout;
        let path = layout.path(label);
        let mut plan = Plan::new();

        plan.position_blocking(path.hallway)?
            .position_blocking(path.bin)?
            .axis(Axis::Z, layout.grab_depth, Completion::Await)?
            .position_blocking(path.hallway)?
            .position_blocking(layout.drop_off)?
            .axis(Axis::Z, layout.z_top, Completion::Await)?
            .position(layout.standby, Completion::Detach, Completion::Await)?;

        Ok(plan)
    }
}
