//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod axis;
pub mod control;
pub mod encoder;

pub use axis::{axis_task, AxisDriveConfig};
pub use control::{control_task, Gantry, Pad, Touch};
pub use encoder::encoder_task;
