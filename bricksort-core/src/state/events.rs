//! Events reported by the control loop

use crate::color::ColorLabel;

/// Events produced by one control tick
///
/// State-changing events drive [`OperatingMode::transition`]; the rest are
/// activity reports for logging.
///
/// [`OperatingMode::transition`]: super::OperatingMode::transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Mode events
    /// LEFT and RIGHT held together
    CalibrationRequested,
    /// Homing finished, axes zeroed
    CalibrationComplete,
    /// Touch sensor pressed
    ModeAdvance,

    // Manual control
    /// Z-axis mode toggled (true when the UP/DOWN pair now drives Z)
    VerticalJog(bool),

    // Routine outcomes
    /// Brick placed in its bin
    Stored(ColorLabel),
    /// Store refused, bin already full
    AlreadyStored(ColorLabel),
    /// Brick carried to the drop-off point
    Retrieved(ColorLabel),
    /// Retrieve requested for an empty bin
    NothingToRetrieve(ColorLabel),
}

impl Event {
    /// Check if this event changes the operating mode
    pub fn is_mode_event(&self) -> bool {
        matches!(
            self,
            Event::CalibrationRequested | Event::CalibrationComplete | Event::ModeAdvance
        )
    }
}
