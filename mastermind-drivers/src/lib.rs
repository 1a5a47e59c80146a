//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the console traits
//! defined in mastermind-core, on top of `embedded-hal` pins and delays:
//!
//! - HD44780 character LCD over a 4-bit bus
//! - Indicator LEDs with blink patterns
//! - Deadline-bounded button press counter

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod button;
pub mod lcd;
pub mod led;

pub use button::PressCounter;
pub use lcd::{Hd44780, LcdError};
pub use led::{Led, LedPair};
