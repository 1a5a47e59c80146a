//! Raspberry Pi HAL for the Mastermind console
//!
//! This crate provides Linux userspace implementations of the shared
//! `mastermind-hal` abstractions for BCM2835-family boards:
//!
//! - [`map::GpioMap`] - the GPIO register block mapped from `/dev/mem`
//! - [`timer::IntervalTimer`] - a `CLOCK_MONOTONIC` one-shot timer whose
//!   `SIGALRM` handler raises the expiry flag
//! - [`delay::SleepDelay`] - `embedded-hal` delays backed by the OS sleep

pub mod delay;
pub mod error;
pub mod map;
pub mod timer;

pub use delay::SleepDelay;
pub use error::HalError;
pub use map::{GpioMap, PeripheralBase};
pub use timer::IntervalTimer;

// Re-export shared types from mastermind-hal for convenience
pub use mastermind_hal::{Deadline, Gpio, GpioPin, Level, Pin};
