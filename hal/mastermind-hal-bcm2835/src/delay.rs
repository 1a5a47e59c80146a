//! Blocking delays for settle times, strobes and pacing

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// `DelayNs` implementation that sleeps the calling thread
///
/// The OS may oversleep; every delay in the console is a lower bound
/// (settle and hold times), so that is acceptable.
#[derive(Debug, Default, Clone, Copy)]
pub struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        if ns > 0 {
            thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }

    fn delay_us(&mut self, us: u32) {
        if us > 0 {
            thread::sleep(Duration::from_micros(u64::from(us)));
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        if ms > 0 {
            thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_sleep_is_lower_bound() {
        let mut delay = SleepDelay;
        let start = Instant::now();
        delay.delay_ms(5);
        delay.delay_us(500);
        assert!(start.elapsed() >= Duration::from_micros(5_500));
    }

    #[test]
    fn test_zero_delay_returns() {
        let mut delay = SleepDelay;
        delay.delay_ns(0);
        delay.delay_us(0);
        delay.delay_ms(0);
    }
}
