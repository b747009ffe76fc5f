//! Axis control
//!
//! Bounded jog and absolute moves for each gantry axis.

pub mod controller;

pub use controller::{Axes, Axis, AxisConfig, AxisController, JogDirection};
