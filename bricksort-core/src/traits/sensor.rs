//! Sensor traits (color and touch)

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors that can occur when reading a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed
    Bus,
    /// Device did not identify as the expected part
    WrongDevice,
    /// Conversion not finished yet
    NotReady,
}

/// One tri-channel reflected light sample
///
/// Channels are in sensor percent units; small negative values can appear
/// after dark-level compensation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl Rgb {
    /// Create a sample from its three channels
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Channels in red, green, blue order
    pub fn channels(&self) -> [i32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<(i32, i32, i32)> for Rgb {
    fn from((r, g, b): (i32, i32, i32)) -> Self {
        Self::new(r, g, b)
    }
}

/// Trait for an RGB color sensor
pub trait ColorSensor {
    /// Take one reflected-light sample
    async fn rgb(&mut self) -> Result<Rgb, SensorError>;
}

/// Trait for a binary touch switch
pub trait TouchSensor {
    /// Check if the switch is currently pressed
    fn is_pressed(&mut self) -> bool;
}
