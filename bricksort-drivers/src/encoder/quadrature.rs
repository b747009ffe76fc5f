//! Quadrature encoder decoding
//!
//! Counts every edge of the A/B pair (4x decoding). Transitions that skip
//! a state are treated as noise and ignored rather than guessed.

/// Encoder resolution and mounting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    /// Edges per output shaft revolution
    pub counts_per_rev: i32,
    /// Swap the counting direction
    pub inverted: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            counts_per_rev: 720,
            inverted: false,
        }
    }
}

/// Quadrature decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureDecoder {
    config: EncoderConfig,
    /// Last Gray-code phase (0..4)
    phase: u8,
    count: i32,
    /// Invalid transitions seen since start
    glitches: u32,
}

/// Phase index of an A/B level pair along the forward Gray sequence
fn phase(a: bool, b: bool) -> u8 {
    match (a, b) {
        (false, false) => 0,
        (true, false) => 1,
        (true, true) => 2,
        (false, true) => 3,
    }
}

impl QuadratureDecoder {
    /// Start decoding from the current pin levels
    pub fn new(config: EncoderConfig, a: bool, b: bool) -> Self {
        Self {
            config,
            phase: phase(a, b),
            count: 0,
            glitches: 0,
        }
    }

    /// Feed new pin levels, returning the step taken (-1, 0 or 1)
    pub fn update(&mut self, a: bool, b: bool) -> i32 {
        let next = phase(a, b);
        let step = match (next + 4 - self.phase) % 4 {
            0 => 0,
            1 => 1,
            3 => -1,
            _ => {
                self.glitches += 1;
                0
            }
        };
        self.phase = next;

        let step = if self.config.inverted { -step } else { step };
        self.count = self.count.wrapping_add(step);
        step
    }

    /// Raw edge count since start
    pub fn count(&self) -> i32 {
        self.count
    }

    /// Shaft angle in whole degrees since start
    pub fn degrees(&self) -> i32 {
        counts_to_degrees(self.count, self.config.counts_per_rev)
    }

    /// Transitions that skipped a phase
    pub fn glitches(&self) -> u32 {
        self.glitches
    }
}

/// Convert an edge count to degrees, rounding toward zero
pub fn counts_to_degrees(count: i32, counts_per_rev: i32) -> i32 {
    (count as i64 * 360 / counts_per_rev.max(1) as i64) as i32
}
