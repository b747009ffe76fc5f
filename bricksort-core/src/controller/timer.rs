//! Explicitly reset interval timer

/// Milliseconds since the last reset
///
/// Arithmetic wraps, so the timer stays correct across clock rollover as
/// long as intervals are shorter than ~49 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElapsedTimer {
    start_ms: u32,
}

impl ElapsedTimer {
    /// Start timing at `now_ms`
    pub const fn new(now_ms: u32) -> Self {
        Self { start_ms: now_ms }
    }

    /// Milliseconds elapsed at `now_ms`
    pub fn elapsed(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.start_ms)
    }

    /// Check if strictly more than `period_ms` has passed
    pub fn exceeded(&self, now_ms: u32, period_ms: u32) -> bool {
        self.elapsed(now_ms) > period_ms
    }

    /// Restart timing at `now_ms`
    pub fn reset(&mut self, now_ms: u32) {
        self.start_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_is_exclusive() {
        let timer = ElapsedTimer::new(100);
        assert!(!timer.exceeded(1100, 1000));
        assert!(timer.exceeded(1101, 1000));
    }

    #[test]
    fn test_reset_restarts() {
        let mut timer = ElapsedTimer::new(0);
        timer.reset(5000);
        assert_eq!(timer.elapsed(5200), 200);
    }

    #[test]
    fn test_wraps_across_rollover() {
        let timer = ElapsedTimer::new(u32::MAX - 10);
        assert_eq!(timer.elapsed(20), 31);
    }
}
