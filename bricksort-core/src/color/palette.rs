//! Threshold-based color classifier
//!
//! A sample matches a palette entry when every channel lies strictly within
//! `threshold` of the entry's reference. Entries are tried in
//! [`ColorLabel::ALL`] order and the first match wins, so references must be
//! separated by more than the threshold to stay unambiguous.

use super::label::{ColorLabel, ColorMap};
use crate::traits::Rgb;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default per-channel match threshold
pub const DEFAULT_THRESHOLD: i32 = 3;

/// One palette row, as seen by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaletteEntry {
    /// Color this row classifies to
    pub label: ColorLabel,
    /// Reference sample for the color
    pub reference: Rgb,
    /// Exclusive per-channel tolerance
    pub threshold: i32,
}

impl PaletteEntry {
    /// Check if a sample is within threshold on all three channels
    pub fn matches(&self, sample: Rgb) -> bool {
        sample
            .channels()
            .iter()
            .zip(self.reference.channels().iter())
            .all(|(s, r)| (s - r).abs() < self.threshold)
    }
}

/// Reference table used for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Palette {
    /// Exclusive per-channel tolerance shared by all entries
    pub threshold: i32,
    /// Reference sample for each color
    pub references: ColorMap<Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            references: ColorMap::new([
                Rgb::new(8, 0, 0),   // red
                Rgb::new(0, 2, 24),  // blue
                Rgb::new(-1, 5, 0),  // green
                Rgb::new(12, 8, 1),  // yellow
                Rgb::new(4, 7, 1),   // light green
                Rgb::new(13, 1, 0),  // orange
            ]),
        }
    }
}

impl Palette {
    /// Palette row for a label
    pub fn entry(&self, label: ColorLabel) -> PaletteEntry {
        PaletteEntry {
            label,
            reference: self.references[label],
            threshold: self.threshold,
        }
    }

    /// Iterate over the rows in evaluation order
    pub fn entries(&self) -> impl Iterator<Item = PaletteEntry> + '_ {
        ColorLabel::ALL.into_iter().map(move |label| self.entry(label))
    }

    /// Classify a sample, `None` meaning no reference is close enough
    pub fn classify(&self, sample: Rgb) -> Option<ColorLabel> {
        self.entries()
            .find(|entry| entry.matches(sample))
            .map(|entry| entry.label)
    }

    /// Check that no sample can match two references
    ///
    /// Two entries can share a match only if their references are closer
    /// than twice the threshold on every channel.
    pub fn is_unambiguous(&self) -> bool {
        for (i, a) in ColorLabel::ALL.iter().enumerate() {
            for b in &ColorLabel::ALL[i + 1..] {
                let ra = self.references[*a].channels();
                let rb = self.references[*b].channels();
                let overlapping = ra
                    .iter()
                    .zip(rb.iter())
                    .all(|(x, y)| (x - y).abs() < 2 * self.threshold - 1);
                if overlapping {
                    return false;
                }
            }
        }
        true
    }
}
