//! Timer Abstractions
//!
//! Monotonic tick source for the dispatch loop, read from the embassy time
//! driver.

use embassy_time::Instant;

use crate::types::Ticks;

/// Current monotonic time as loop ticks
///
/// Truncated to 32 bits; [`Ticks`] compares with wrapping arithmetic.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn now() -> Ticks {
    Ticks::from_millis(Instant::now().as_millis() as u32)
}

/// Stopwatch for timing measurements
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    start: Ticks,
}

impl Stopwatch {
    /// Start a stopwatch now
    #[must_use]
    pub fn start() -> Self {
        Self { start: now() }
    }

    /// Milliseconds since start
    #[must_use]
    pub fn elapsed_ms(&self) -> u32 {
        now().elapsed_since(self.start)
    }

    /// Restart and return previous elapsed time
    pub fn restart(&mut self) -> u32 {
        let elapsed = self.elapsed_ms();
        self.start = now();
        elapsed
    }
}
