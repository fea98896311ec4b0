//! Tick clock.
use core::sync::atomic::{AtomicU64, Ordering};

/// Counts timer interrupts since boot.
///
/// Only hart 0 advances the clock; every hart may read it.
pub struct Clock {
    ticks: AtomicU64,
}

impl Clock {
    /// Create a clock at tick zero.
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
        }
    }

    /// Advance the clock by one tick and return the new count.
    pub fn tick(&self) -> u64 {
        self.ticks.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Ticks since boot.
    pub fn uptime(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
