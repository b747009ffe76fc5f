//! Embassy time source for the control loop

use bricksort_core::traits::Clock;
use embassy_time::{Instant, Timer};

/// Milliseconds since the clock was created
pub struct EmbassyClock {
    origin: Instant,
}

impl EmbassyClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }

    async fn delay_ms(&mut self, ms: u32) {
        Timer::after_millis(ms as u64).await;
    }
}

impl Default for EmbassyClock {
    fn default() -> Self {
        Self::new()
    }
}
