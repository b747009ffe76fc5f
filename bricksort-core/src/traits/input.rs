//! Button pad trait and the pressed-button snapshot

/// Buttons on the operator pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    Center,
}

impl Button {
    /// All pad buttons
    pub const ALL: [Button; 5] = [
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
        Button::Center,
    ];

    fn mask(self) -> u8 {
        match self {
            Button::Left => 1 << 0,
            Button::Right => 1 << 1,
            Button::Up => 1 << 2,
            Button::Down => 1 << 3,
            Button::Center => 1 << 4,
        }
    }
}

/// Set of buttons held down at the moment the pad was read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSet(u8);

impl ButtonSet {
    /// No buttons pressed
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a set from a list of buttons
    pub fn of(buttons: &[Button]) -> Self {
        buttons.iter().fold(Self::empty(), |set, &b| set.with(b))
    }

    /// Return a copy of this set with `button` added
    pub fn with(mut self, button: Button) -> Self {
        self.insert(button);
        self
    }

    /// Add a button to the set
    pub fn insert(&mut self, button: Button) {
        self.0 |= button.mask();
    }

    /// Check if a button is in the set
    pub fn contains(&self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }

    /// Check if `button` is pressed while `other` is not
    pub fn only_one_of(&self, button: Button, other: Button) -> bool {
        self.contains(button) && !self.contains(other)
    }

    /// Check if no button is pressed
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Trait for the operator button pad
pub trait ButtonPad {
    /// Read the set of buttons currently held down
    fn pressed(&mut self) -> ButtonSet;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_set_membership() {
        let set = ButtonSet::of(&[Button::Left, Button::Center]);
        assert!(set.contains(Button::Left));
        assert!(set.contains(Button::Center));
        assert!(!set.contains(Button::Right));
        assert!(!set.is_empty());
        assert!(ButtonSet::empty().is_empty());
    }

    #[test]
    fn test_only_one_of() {
        let up = ButtonSet::of(&[Button::Up]);
        let both = ButtonSet::of(&[Button::Up, Button::Down]);
        assert!(up.only_one_of(Button::Up, Button::Down));
        assert!(!both.only_one_of(Button::Up, Button::Down));
        assert!(!up.only_one_of(Button::Down, Button::Up));
    }

    #[test]
    fn test_masks_are_distinct() {
        let all = ButtonSet::of(&Button::ALL);
        for button in Button::ALL {
            assert!(all.contains(button));
            assert_eq!(ButtonSet::of(&[button]).0.count_ones(), 1);
        }
    }
}
