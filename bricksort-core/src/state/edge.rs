//! Press edge detection

/// Per-input debounce state
///
/// Fires once on the released-to-pressed transition and stays quiet while
/// the input is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEdge {
    #[default]
    Released,
    Pressed,
}

impl ButtonEdge {
    /// Feed the current level, returning true on a rising edge
    pub fn update(&mut self, pressed: bool) -> bool {
        let rising = pressed && *self == ButtonEdge::Released;
        *self = if pressed {
            ButtonEdge::Pressed
        } else {
            ButtonEdge::Released
        };
        rising
    }
}
