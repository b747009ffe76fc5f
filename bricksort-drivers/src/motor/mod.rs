//! Motor driver implementations
//!
//! Encoder DC motors run under a closed-loop position servo.

pub mod servo;

pub use servo::{ServoConfig, ServoMotor, ServoState};
