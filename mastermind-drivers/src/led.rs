//! Indicator LEDs
//!
//! Active-high LEDs on output pins. A blink is one on period followed by
//! one off period of equal length.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use mastermind_core::traits::{DeviceError, Indicator, Indicators};

/// Default on / off time of one blink (ms)
const BLINK_MS: u32 = 1500;

/// A single LED
pub struct Led<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> Led<P> {
    /// Create an LED output, starting off
    pub fn new(pin: P) -> Result<Self, P::Error> {
        let mut led = Self { pin, on: false };
        led.set(false)?;
        Ok(led)
    }

    /// Turn the LED on or off
    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        if on {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.on = on;
        Ok(())
    }

    /// Check if the LED is lit
    pub fn is_on(&self) -> bool {
        self.on
    }
}

/// The console's green (primary) and red (secondary) LEDs
pub struct LedPair<P, D> {
    green: Led<P>,
    red: Led<P>,
    delay: D,
    blink_ms: u32,
}

impl<P, D> LedPair<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Pair two LEDs sharing a blink delay
    pub fn new(green: Led<P>, red: Led<P>, delay: D) -> Self {
        Self {
            green,
            red,
            delay,
            blink_ms: BLINK_MS,
        }
    }

    /// Set the on / off time of one blink
    pub fn with_blink_time(mut self, ms: u32) -> Self {
        self.blink_ms = ms;
        self
    }

    /// Borrow one LED
    pub fn led(&self, which: Indicator) -> &Led<P> {
        match which {
            Indicator::Green => &self.green,
            Indicator::Red => &self.red,
        }
    }

    fn led_mut(&mut self, which: Indicator) -> &mut Led<P> {
        match which {
            Indicator::Green => &mut self.green,
            Indicator::Red => &mut self.red,
        }
    }
}

impl<P, D> Indicators for LedPair<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    fn set(&mut self, which: Indicator, on: bool) -> Result<(), DeviceError> {
        self.led_mut(which)
            .set(on)
            .map_err(|_| DeviceError::Indicator)
    }

    fn blink(&mut self, which: Indicator, times: u8) -> Result<(), DeviceError> {
        for _ in 0..times {
            for on in [true, false] {
                self.led_mut(which)
                    .set(on)
                    .map_err(|_| DeviceError::Indicator)?;
                self.delay.delay_ms(self.blink_ms);
            }
        }
        Ok(())
    }
}
