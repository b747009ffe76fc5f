//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod actuator;
pub mod clock;
pub mod display;
pub mod input;
pub mod sensor;

pub use actuator::{Actuator, Completion, StopMode};
pub use clock::Clock;
pub use display::{Display, DisplayError, LightColor, StatusLight};
pub use input::{Button, ButtonPad, ButtonSet};
pub use sensor::{ColorSensor, Rgb, SensorError, TouchSensor};
