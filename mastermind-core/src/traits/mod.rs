//! Console device traits
//!
//! These traits define the interface between the session logic and the
//! drivers for the LCD, the two LEDs and the push button.

pub mod console;

pub use console::{DeviceError, DigitInput, Indicator, Indicators, TextDisplay};
