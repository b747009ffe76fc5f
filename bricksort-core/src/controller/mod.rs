//! Control loop
//!
//! The mode controller runs one tick per loop iteration: read inputs once,
//! handle mode changes, then run the active mode's behavior.

pub mod menu;
pub mod mode;
pub mod screen;
pub mod timer;

pub use menu::RetrievalMenu;
pub use mode::{InputSnapshot, ModeController, TickEvents, MAX_TICK_EVENTS};
pub use timer::ElapsedTimer;

use crate::motion::PlanError;
use crate::traits::{DisplayError, SensorError};

/// Errors that abort a control tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlError {
    /// Display bus failure
    Display(DisplayError),
    /// Color sensor bus failure
    Sensor(SensorError),
    /// Routine did not fit the plan buffer
    Plan(PlanError),
}

impl From<DisplayError> for ControlError {
    fn from(e: DisplayError) -> Self {
        ControlError::Display(e)
    }
}

impl From<SensorError> for ControlError {
    fn from(e: SensorError) -> Self {
        ControlError::Sensor(e)
    }
}

impl From<PlanError> for ControlError {
    fn from(e: PlanError) -> Self {
        ControlError::Plan(e)
    }
}
