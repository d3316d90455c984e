//! Time source abstraction
//!
//! Blocking transfers bound each byte by a deadline taken from a monotonic
//! millisecond clock. Chip backends wrap their tick counter; tests inject a
//! fake clock.

/// Monotonic millisecond clock
///
/// The value must never go backwards. The epoch is arbitrary.
pub trait Monotonic {
    /// Milliseconds since an arbitrary epoch
    fn now_ms(&self) -> u64;

    /// Deadline `timeout_ms` from now
    fn deadline_ms(&self, timeout_ms: u32) -> u64 {
        self.now_ms().saturating_add(timeout_ms as u64)
    }

    /// Check whether a deadline has passed
    fn expired(&self, deadline_ms: u64) -> bool {
        self.now_ms() >= deadline_ms
    }
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
