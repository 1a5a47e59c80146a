//! Mastermind Console Hardware Abstraction Layer
//!
//! This crate defines the register-level GPIO model and the deadline
//! abstraction shared by the board backend and the device drivers. The
//! same driver and game code runs against the memory-mapped register
//! block on a Raspberry Pi and against an in-memory register file in
//! tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  mastermind-console (binary)            │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  mastermind-  │       │  mastermind-  │
//! │    drivers    │       │     core      │
//! └───────────────┘       └───────────────┘
//!         │
//!         ▼
//! ┌─────────────────────────────────────────┐
//! │  mastermind-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  mastermind-hal-bcm2835 (/dev/mem)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Contents
//!
//! - [`registers::Registers`] - word access to a GPIO register block
//! - [`gpio::Gpio`], [`gpio::GpioPin`] - pin mode, level write and read
//! - [`timer::Deadline`], [`timer::ExpiryFlag`] - bounded input waits

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod registers;
pub mod timer;

// Re-export key types at crate root for convenience
pub use gpio::{Direction, Gpio, GpioPin, Level, Pin, GPIO_COUNT};
pub use registers::{RegisterFile, Registers, BLOCK_SIZE};
pub use timer::{Deadline, ExpiryFlag};
