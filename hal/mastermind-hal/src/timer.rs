//! Deadline abstraction for bounded input waits
//!
//! A deadline is armed before a polling loop and expires asynchronously,
//! from a timer callback on the host or a mock in tests. The only datum
//! shared between the two contexts is an [`ExpiryFlag`].

use portable_atomic::{AtomicBool, Ordering};

/// Single-writer / single-reader expiry flag
///
/// The timer callback only ever calls [`raise`](Self::raise); the polling
/// loop only ever calls [`is_raised`](Self::is_raised). The owner of the
/// deadline calls [`clear`](Self::clear) when arming, before the callback
/// can fire. Raising is a single atomic store, so it is safe to call from
/// a signal handler.
pub struct ExpiryFlag {
    expired: AtomicBool,
}

impl Default for ExpiryFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpiryFlag {
    /// Create a lowered flag (usable in a `static`)
    pub const fn new() -> Self {
        Self {
            expired: AtomicBool::new(false),
        }
    }

    /// Lower the flag (arming side)
    pub fn clear(&self) {
        self.expired.store(false, Ordering::Release);
    }

    /// Raise the flag (callback side)
    pub fn raise(&self) {
        self.expired.store(true, Ordering::Release);
    }

    /// Check whether the deadline has passed (polling side)
    pub fn is_raised(&self) -> bool {
        self.expired.load(Ordering::Acquire)
    }
}

/// A one-shot deadline
pub trait Deadline {
    /// Arm the deadline `timeout_us` microseconds from now
    ///
    /// Clears the expiry state before the timer starts. Re-arming an armed
    /// deadline restarts it.
    fn arm(&mut self, timeout_us: u32);

    /// Check whether the armed deadline has passed
    fn is_expired(&self) -> bool;
}
