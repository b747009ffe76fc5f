//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in bricksort-core for the sorter's hardware:
//!
//! - Closed-loop servo control for encoder DC motors
//! - Quadrature encoder decoding
//! - TCS34725 RGB color sensor
//! - SH1106 OLED line console
//! - GPIO button pad and touch switch
//! - PWM RGB status light

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;
pub mod encoder;
pub mod input;
pub mod light;
pub mod motor;
pub mod sensor;

#[cfg(test)]
pub(crate) mod fake;
