//! Per-color storage inventory
//!
//! Each color has exactly one bin, and a bin holds one brick. The model only
//! records occupancy; refusing a second brick of a color is the caller's
//! policy, checked with [`Inventory::is_occupied`] before storing.

use crate::color::{ColorLabel, ColorMap};

/// Occupancy of one color's bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InventorySlot {
    pub label: ColorLabel,
    pub occupied: bool,
}

/// Occupancy of all bins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inventory {
    occupied: ColorMap<bool>,
}

impl Inventory {
    /// Create an inventory with every bin empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a color's bin holds a brick
    pub fn is_occupied(&self, label: ColorLabel) -> bool {
        self.occupied[label]
    }

    /// Record a brick placed in a color's bin
    pub fn mark_occupied(&mut self, label: ColorLabel) {
        self.occupied[label] = true;
    }

    /// Record a color's bin emptied
    pub fn mark_empty(&mut self, label: ColorLabel) {
        self.occupied[label] = false;
    }

    /// Number of occupied bins
    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|(_, occupied)| **occupied).count()
    }

    /// Iterate over every bin in label order
    pub fn slots(&self) -> impl Iterator<Item = InventorySlot> + '_ {
        self.occupied.iter().map(|(label, occupied)| InventorySlot {
            label,
            occupied: *occupied,
        })
    }
}
