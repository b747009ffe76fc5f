//! Operating mode state machine
//!
//! The active mode decides what a control tick does with the inputs.

use super::events::Event;

/// Operating modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Jog the axes from the button pad
    #[default]
    Manual,
    /// Classify the brick at the intake and store it
    AutoStore,
    /// Browse the colors and retrieve one
    AutoRetrieve,
    /// Homing in progress (transient)
    Calibrate,
}

impl OperatingMode {
    /// Label shown on the display and in logs
    pub fn name(self) -> &'static str {
        match self {
            OperatingMode::Manual => "Manual control",
            OperatingMode::AutoStore => "Auto store",
            OperatingMode::AutoRetrieve => "Auto retrieve",
            OperatingMode::Calibrate => "Calibration",
        }
    }

    /// Process an event and return the next mode
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use OperatingMode::*;

        match (self, event) {
            // Calibration preempts every other mode
            (Calibrate, CalibrationComplete) => Manual,
            (Calibrate, _) => Calibrate,
            (_, CalibrationRequested) => Calibrate,

            // Touch sensor cycle
            (Manual, ModeAdvance) => AutoStore,
            (AutoStore, ModeAdvance) => AutoRetrieve,
            (AutoRetrieve, ModeAdvance) => Manual,

            _ => self,
        }
    }
}
