//! Board-agnostic core logic for the gantry sorter firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (actuator, color sensor, display, inputs)
//! - Color classification against a fixed palette
//! - Bounded per-axis jog and absolute moves
//! - Pick/place routine planning and sequencing
//! - Per-color inventory
//! - Operating-mode state machine and the control loop tick
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]
#![allow(async_fn_in_trait)]

#[cfg(test)]
extern crate std;

pub mod axis;
pub mod color;
pub mod config;
pub mod controller;
pub mod inventory;
pub mod motion;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;
