//! Sensor driver implementations

pub mod tcs34725;

pub use tcs34725::{Gain, Tcs34725, Tcs34725Config, TCS34725_ADDR};
