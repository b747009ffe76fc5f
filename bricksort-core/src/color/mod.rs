//! Color classification
//!
//! Maps raw sensor samples to brick colors against a fixed palette.

pub mod label;
pub mod palette;

pub use label::{ColorLabel, ColorMap, COLOR_COUNT};
pub use palette::{Palette, PaletteEntry, DEFAULT_THRESHOLD};
