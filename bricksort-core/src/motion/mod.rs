//! Pick-and-place routines
//!
//! Waypoints, routine plans and the sequencer that executes them.

pub mod plan;
pub mod position;
pub mod sequencer;

pub use plan::{
    CalibrationConfig, MoveStep, Plan, PlanError, RoutinePlanner, Step, CALIBRATION_ORDER,
    MAX_PLAN_STEPS,
};
pub use position::{ColorPath, Layout, Position};
pub use sequencer::{MotionSequencer, RetrieveOutcome, StoreOutcome};
