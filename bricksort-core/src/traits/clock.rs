//! Time source trait

/// Monotonic millisecond clock with a cooperative delay
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin (wrapping)
    fn now_ms(&self) -> u32;

    /// Suspend the control flow for `ms` milliseconds
    async fn delay_ms(&mut self, ms: u32);
}
