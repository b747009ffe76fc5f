//! Color labels and the per-color lookup table

use core::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of brick colors the machine sorts
pub const COLOR_COUNT: usize = 6;

/// Brick colors recognized by the classifier
///
/// An unrecognized sample is represented as `None` wherever an
/// `Option<ColorLabel>` is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorLabel {
    Red,
    Blue,
    Green,
    Yellow,
    LightGreen,
    Orange,
}

impl ColorLabel {
    /// All labels in classification and menu order
    pub const ALL: [ColorLabel; COLOR_COUNT] = [
        ColorLabel::Red,
        ColorLabel::Blue,
        ColorLabel::Green,
        ColorLabel::Yellow,
        ColorLabel::LightGreen,
        ColorLabel::Orange,
    ];

    /// Position of this label in [`ColorLabel::ALL`]
    pub const fn index(self) -> usize {
        match self {
            ColorLabel::Red => 0,
            ColorLabel::Blue => 1,
            ColorLabel::Green => 2,
            ColorLabel::Yellow => 3,
            ColorLabel::LightGreen => 4,
            ColorLabel::Orange => 5,
        }
    }

    /// Human-readable name for the display
    pub fn name(self) -> &'static str {
        match self {
            ColorLabel::Red => "red",
            ColorLabel::Blue => "blue",
            ColorLabel::Green => "green",
            ColorLabel::Yellow => "yellow",
            ColorLabel::LightGreen => "light green",
            ColorLabel::Orange => "orange",
        }
    }
}

/// One value per color, indexed by [`ColorLabel`]
///
/// Backed by a fixed array so every label always has an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ColorMap<T>([T; COLOR_COUNT]);

impl<T> ColorMap<T> {
    /// Create a map from values in [`ColorLabel::ALL`] order
    pub const fn new(values: [T; COLOR_COUNT]) -> Self {
        Self(values)
    }

    /// Get the value for a label
    pub fn get(&self, label: ColorLabel) -> &T {
        &self.0[label.index()]
    }

    /// Get a mutable reference to the value for a label
    pub fn get_mut(&mut self, label: ColorLabel) -> &mut T {
        &mut self.0[label.index()]
    }

    /// Iterate over `(label, value)` pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (ColorLabel, &T)> {
        ColorLabel::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T: Copy> ColorMap<T> {
    /// Create a map with the same value for every label
    pub const fn splat(value: T) -> Self {
        Self([value; COLOR_COUNT])
    }
}

impl<T> Index<ColorLabel> for ColorMap<T> {
    type Output = T;

    fn index(&self, label: ColorLabel) -> &T {
        self.get(label)
    }
}

impl<T> IndexMut<ColorLabel> for ColorMap<T> {
    fn index_mut(&mut self, label: ColorLabel) -> &mut T {
        self.get_mut(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, label) in ColorLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
        }
        assert_eq!(ColorLabel::ALL.len(), COLOR_COUNT);
    }

    #[test]
    fn test_color_map_access() {
        let mut map = ColorMap::splat(0u8);
        map[ColorLabel::Yellow] = 3;
        *map.get_mut(ColorLabel::Red) += 1;

        assert_eq!(map[ColorLabel::Yellow], 3);
        assert_eq!(*map.get(ColorLabel::Red), 1);
        assert_eq!(map[ColorLabel::Orange], 0);

        let labels: heapless::Vec<ColorLabel, COLOR_COUNT> = map.iter().map(|(l, _)| l).collect();
        assert_eq!(labels.as_slice(), &ColorLabel::ALL);
    }
}
