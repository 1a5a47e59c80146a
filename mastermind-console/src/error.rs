//! Console error type
//!
//! Everything that can stop the console before or during a game. The core
//! and driver crates are `no_std` and keep plain enums; they are folded in
//! here with their `Display` text.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use mastermind_core::traits::DeviceError;
use mastermind_core::{ConfigError, SequenceError};
use mastermind_drivers::LcdError;
use mastermind_hal_bcm2835::HalError;

/// Console failures, each one fatal to the run
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// GPIO mapping or the interval timer could not be acquired
    #[error("hardware unavailable: {0}")]
    HardwareUnavailable(#[from] HalError),

    /// The display configuration cannot be driven
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// A preset or command-line sequence is not playable
    #[error("invalid sequence: {0}")]
    Sequence(SequenceError),

    /// The configuration failed validation
    #[error("invalid configuration: {0}")]
    Config(ConfigError),

    /// A console device stopped responding mid-game
    #[error("device failure: {0}")]
    Device(DeviceError),

    /// The configuration file could not be read
    #[error("unable to read {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for the console
    #[error("unable to parse configuration: {0}")]
    ParseConfig(#[from] toml::de::Error),

    /// Terminal I/O failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl From<SequenceError> for ConsoleError {
    fn from(e: SequenceError) -> Self {
        ConsoleError::Sequence(e)
    }
}

impl From<ConfigError> for ConsoleError {
    fn from(e: ConfigError) -> Self {
        ConsoleError::Config(e)
    }
}

impl From<DeviceError> for ConsoleError {
    fn from(e: DeviceError) -> Self {
        ConsoleError::Device(e)
    }
}

impl<E: core::fmt::Debug> From<LcdError<E>> for ConsoleError {
    fn from(e: LcdError<E>) -> Self {
        match e {
            LcdError::Pin(_) => ConsoleError::Device(DeviceError::Display),
            other => ConsoleError::UnsupportedConfiguration(other.to_string()),
        }
    }
}
