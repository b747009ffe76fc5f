//! Operator input drivers

pub mod gpio;

pub use gpio::{GpioButtonPad, GpioTouchSensor};
