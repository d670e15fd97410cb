use std::time::Instant;

/// Monotonic clock anchored at process start.
///
/// All deadlines are milliseconds on this clock, so they fit in an
/// `AtomicU64` and are unaffected by wall-clock adjustments.
#[derive(Copy, Clone)]
pub struct TimerClock {
    start: Instant,
}

impl TimerClock {
    pub fn new() -> Self {
        TimerClock {
            start: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock was created.
    pub fn now_ms(&self) -> u64 {
        self.start
            .elapsed()
            .as_millis()
            .try_into()
            .unwrap_or(u64::MAX)
    }
}
