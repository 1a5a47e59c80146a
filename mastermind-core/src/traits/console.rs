//! Traits for the console's output and input devices

use core::fmt;

/// Errors reported by console devices
///
/// Register-level GPIO access is infallible, so these only surface from
/// drivers wrapping fallible pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// LCD pin could not be driven
    Display,
    /// LED pin could not be driven
    Indicator,
    /// Button pin could not be read
    Input,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Display => write!(f, "display write failed"),
            DeviceError::Indicator => write!(f, "indicator write failed"),
            DeviceError::Input => write!(f, "button read failed"),
        }
    }
}

/// Character display
pub trait TextDisplay {
    /// Clear the screen and home the cursor
    fn clear(&mut self) -> Result<(), DeviceError>;

    /// Show `message` on `row`, scrolling it if it does not fit
    fn print(&mut self, message: &str, row: u8) -> Result<(), DeviceError>;
}

/// The two indicator LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// Primary LED, blinks counts
    Green,
    /// Secondary LED, blinks separators and acknowledgements
    Red,
}

/// LED feedback
pub trait Indicators {
    /// Turn one LED on or off
    fn set(&mut self, which: Indicator, on: bool) -> Result<(), DeviceError>;

    /// Blink one LED `times` times (no-op for zero)
    fn blink(&mut self, which: Indicator, times: u8) -> Result<(), DeviceError>;
}

/// Source of guess digits
pub trait DigitInput {
    /// Wait for one input window and return the number of presses seen
    ///
    /// The result is unvalidated: zero and out-of-range counts are
    /// returned as-is for the caller to reject.
    fn read_count(&mut self) -> Result<u8, DeviceError>;
}
