//! Inter-task communication channels
//!
//! The control task is the only writer of axis commands. Each axis task
//! reports finished moves back through its completion signal, and each
//! encoder task publishes its shaft angle through an atomic.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicI32, Ordering};

use bricksort_core::axis::Axis;
use bricksort_core::traits::StopMode;

/// Commands accepted by an axis task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisCommand {
    /// Run at constant speed
    Run { speed: i32 },
    /// Move to an absolute angle; completion is reported
    RunTarget { speed: i32, target: i32, then: StopMode },
    /// Push into a hard stop; the stall angle is reported
    Seek { speed: i32, then: StopMode, torque_pct: u8 },
    /// Redefine the current position; acknowledged with the new angle
    Reset { angle: i32 },
    /// Release the motor
    Stop,
}

type AxisSignal<T> = Signal<CriticalSectionRawMutex, T>;

/// Latest command for each axis (indexed by [`slot`])
pub static AXIS_CMD: [AxisSignal<AxisCommand>; 3] = [Signal::new(), Signal::new(), Signal::new()];

/// Final angle of the last finished target, seek or reset
pub static AXIS_DONE: [AxisSignal<i32>; 3] = [Signal::new(), Signal::new(), Signal::new()];

/// Raw shaft angle in degrees since power-on, written by the encoder tasks
pub static ENCODER_DEGREES: [AtomicI32; 3] = [AtomicI32::new(0), AtomicI32::new(0), AtomicI32::new(0)];

/// Axis angle in the calibrated reference, written by the axis tasks
pub static AXIS_ANGLE: [AtomicI32; 3] = [AtomicI32::new(0), AtomicI32::new(0), AtomicI32::new(0)];

/// Array index for an axis
pub fn slot(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
        Axis::Z => 2,
    }
}

/// Read an axis angle in the calibrated reference
pub fn axis_angle(axis: Axis) -> i32 {
    AXIS_ANGLE[slot(axis)].load(Ordering::Relaxed)
}
