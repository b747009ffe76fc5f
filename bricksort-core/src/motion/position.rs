//! Waypoints for the pick/place routines
//!
//! All positions are hand-tuned motor angles. The gantry never plans a
//! path; it visits these waypoints in a fixed order.

use crate::color::{ColorLabel, ColorMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Target pair in the horizontal plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// X axis angle
    pub x: i32,
    /// Y axis angle
    pub y: i32,
}

impl Position {
    /// Create a position from its two angles
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Two-waypoint path from the aisle to one color's bin
///
/// Store and retrieve both traverse hallway first, then bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorPath {
    /// Staging point in the aisle next to the bin row
    pub hallway: Position,
    /// Point above the bin itself
    pub bin: Position,
}

impl ColorPath {
    /// Create a path from its two waypoints
    pub const fn new(hallway: Position, bin: Position) -> Self {
        Self { hallway, bin }
    }
}

/// Named waypoints and lift heights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    /// Rest position between routines
    pub standby: Position,
    /// Position above the intake where bricks are picked up
    pub pick_up: Position,
    /// Position above the output tray
    pub drop_off: Position,
    /// Z angle with the gripper fully raised
    pub z_top: i32,
    /// Z angle at which the gripper closes on a brick
    pub grab_depth: i32,
    /// Path to each color's bin
    pub paths: ColorMap<ColorPath>,
}

impl Default for Layout {
    fn default() -> Self {
        const LEFT: i32 = 75;
        const RIGHT: i32 = 600;
        const AISLE: i32 = 360;
        const ROW_1: i32 = 450;
        const ROW_2: i32 = 680;
        const ROW_3: i32 = 910;

        let path = |row: i32, column: i32| {
            ColorPath::new(Position::new(AISLE, row), Position::new(column, row))
        };

        Self {
            standby: Position::new(0, 0),
            pick_up: Position::new(350, 54),
            drop_off: Position::new(350, 0),
            z_top: 0,
            grab_depth: 400,
            paths: ColorMap::new([
                path(ROW_1, RIGHT), // red
                path(ROW_1, LEFT),  // blue
                path(ROW_2, RIGHT), // green
                path(ROW_2, LEFT),  // yellow
                path(ROW_3, RIGHT), // light green
                path(ROW_3, LEFT),  // orange
            ]),
        }
    }
}

impl Layout {
    /// Path to a color's bin
    pub fn path(&self, label: ColorLabel) -> &ColorPath {
        &self.paths[label]
    }
}
