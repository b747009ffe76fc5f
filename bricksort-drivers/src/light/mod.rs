//! Status light drivers

pub mod rgb;

pub use rgb::RgbLight;
