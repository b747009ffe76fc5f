//! Display and status light traits

use crate::color::ColorLabel;

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transaction failed
    Bus,
    /// No room left on screen for another line
    ScreenFull,
}

/// Trait for the operator display
///
/// The display is a line printer: every redraw starts with [`Display::clear`]
/// and each [`Display::print`] call writes the next line below the last one.
pub trait Display {
    /// Clear the screen and move the cursor to the top line
    async fn clear(&mut self) -> Result<(), DisplayError>;

    /// Print one line of text below the previous one
    async fn print(&mut self, line: &str) -> Result<(), DisplayError>;

    /// Replace the screen content with the fixed swatch image for a color
    async fn load_image(&mut self, image: ColorLabel) -> Result<(), DisplayError>;
}

/// Status light colors, one per operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightColor {
    Off,
    Red,
    Green,
    Orange,
    Yellow,
}

/// Trait for the brick status light
pub trait StatusLight {
    /// Switch the light to a color
    fn set(&mut self, color: LightColor);
}
