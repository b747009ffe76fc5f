//! Configuration type definitions
//!
//! The whole machine tuning in one value. The firmware build validates
//! `machine.toml` against these types and embeds it as postcard binary data.

use crate::axis::{Axis, AxisConfig};
use crate::color::Palette;
use crate::motion::{CalibrationConfig, Layout, Position};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on the encoded size of a [`RobotConfig`]
pub const MAX_CONFIG_SIZE: usize = 512;

/// Pauses and refresh periods of the control loop (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Manual-mode status screen refresh period
    pub status_refresh_ms: u32,
    /// Minimum spacing of repeated auto-store notices
    pub notice_interval_ms: u32,
    /// Settle time before re-sampling a detected brick
    pub confirm_delay_ms: u32,
    /// Pause after entering auto-store
    pub mode_debounce_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            status_refresh_ms: 1000,
            notice_interval_ms: 500,
            confirm_delay_ms: 250,
            mode_debounce_ms: 100,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RobotConfig {
    pub x: AxisConfig,
    pub y: AxisConfig,
    pub z: AxisConfig,
    pub layout: Layout,
    pub calibration: CalibrationConfig,
    pub timing: TimingConfig,
    pub palette: Palette,
}

impl Default for RobotConfig {
    fn default() -> Self {
        let axis = |max_angle| AxisConfig {
            max_angle,
            ..AxisConfig::default()
        };
        Self {
            x: axis(785),
            y: axis(1000),
            z: axis(400),
            layout: Layout::default(),
            calibration: CalibrationConfig::default(),
            timing: TimingConfig::default(),
            palette: Palette::default(),
        }
    }
}

/// Configuration validation and encoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Travel window is empty or inverted
    InvalidBounds(Axis),
    /// Jog or move speed is not positive
    InvalidSpeed(Axis),
    /// A waypoint lies outside the axis travel
    WaypointOutOfRange(Axis),
    /// Threshold is not positive
    InvalidThreshold,
    /// Two palette references can match the same sample
    AmbiguousPalette,
    /// Stall torque outside 1..=100 percent
    InvalidTorque,
    /// Serialized form does not fit the buffer
    Encode,
    /// Serialized form is corrupt
    Decode,
}

impl RobotConfig {
    /// Per-axis settings
    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Check the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        for axis in Axis::ALL {
            let cfg = self.axis(axis);
            if cfg.min_angle >= cfg.max_angle {
                return Err(ConfigError::InvalidBounds(axis));
            }
            if cfg.jog_speed <= 0 || cfg.move_speed <= 0 {
                return Err(ConfigError::InvalidSpeed(axis));
            }
        }

        let layout = &self.layout;
        let mut waypoints = [layout.standby, layout.pick_up, layout.drop_off]
            .into_iter()
            .chain(layout.paths.iter().flat_map(|(_, p)| [p.hallway, p.bin]));
        if let Some(p) = waypoints.find(|p| !self.reachable(*p)) {
            let axis = if self.x.contains(p.x) { Axis::Y } else { Axis::X };
            return Err(ConfigError::WaypointOutOfRange(axis));
        }
        if !self.z.contains(layout.z_top) || !self.z.contains(layout.grab_depth) {
            return Err(ConfigError::WaypointOutOfRange(Axis::Z));
        }

        if self.palette.threshold <= 0 {
            return Err(ConfigError::InvalidThreshold);
        }
        if !self.palette.is_unambiguous() {
            return Err(ConfigError::AmbiguousPalette);
        }

        let torque = self.calibration.stall_torque_pct;
        if torque == 0 || torque > 100 {
            return Err(ConfigError::InvalidTorque);
        }

        Ok(())
    }

    fn reachable(&self, p: Position) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y)
    }
}

#[cfg(feature = "serde")]
impl RobotConfig {
    /// Serialize into `buf`, returning the used prefix
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encode)
    }

    /// Deserialize from postcard bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)
    }
}
