//! Deadline-bounded button press counter
//!
//! One input window: arm the deadline, then busy-poll the button until the
//! deadline expires. A change into HIGH counts as one press and is followed
//! by a settle delay to ride out contact bounce. The deadline expires from
//! its own context; the loop only reads it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use mastermind_core::traits::{DeviceError, DigitInput};
use mastermind_hal::Deadline;

/// Default input window (µs)
const TIMEOUT_US: u32 = 5_000_000;
/// Default settle delay after a press (ms)
const DEBOUNCE_MS: u32 = 300;

/// Counts presses on one button within a deadline
pub struct PressCounter<I, D, T> {
    button: I,
    delay: D,
    deadline: T,
    timeout_us: u32,
    debounce_ms: u32,
}

impl<I, D, T> PressCounter<I, D, T>
where
    I: InputPin,
    D: DelayNs,
    T: Deadline,
{
    /// Create a counter with the reference window and debounce time
    pub fn new(button: I, delay: D, deadline: T) -> Self {
        Self {
            button,
            delay,
            deadline,
            timeout_us: TIMEOUT_US,
            debounce_ms: DEBOUNCE_MS,
        }
    }

    /// Set the input window length
    pub fn with_timeout(mut self, timeout_us: u32) -> Self {
        self.timeout_us = timeout_us;
        self
    }

    /// Set the settle delay after a press
    pub fn with_debounce(mut self, debounce_ms: u32) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Input window length (µs)
    pub fn timeout_us(&self) -> u32 {
        self.timeout_us
    }

    /// Wait one full input window and return the presses seen
    ///
    /// A press whose rising edge was observed before expiry counts even if
    /// the release falls after it.
    pub fn count_presses(&mut self) -> Result<u8, I::Error> {
        self.deadline.arm(self.timeout_us);

        let mut count: u8 = 0;
        let mut previous = false;

        while !self.deadline.is_expired() {
            let level = self.button.is_high()?;
            if level != previous {
                if level {
                    count = count.saturating_add(1);
                    self.delay.delay_ms(self.debounce_ms);
                }
                previous = level;
            }
        }

        Ok(count)
    }
}

impl<I, D, T> DigitInput for PressCounter<I, D, T>
where
    I: InputPin,
    D: DelayNs,
    T: Deadline,
{
    fn read_count(&mut self) -> Result<u8, DeviceError> {
        self.count_presses().map_err(|_| DeviceError::Input)
    }
}
