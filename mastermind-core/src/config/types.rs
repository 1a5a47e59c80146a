//! Game and timing configuration

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sequence::{SequenceError, MAX_COLORS, MAX_SEQ_LEN};

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Colour count outside 1..=9
    Colors(u8),
    /// Sequence length outside 1..=9
    SeqLen(u8),
    /// Maximum attempts is zero
    NoAttempts,
    /// Input deadline is zero
    NoTimeout,
    /// LCD geometry outside the supported range
    Geometry { cols: u8, rows: u8 },
    /// Pin number the controller does not have
    InvalidPin(u8),
    /// Same pin assigned to two functions
    DuplicatePin(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Colors(n) => write!(f, "colors must be 1..={}, got {}", MAX_COLORS, n),
            ConfigError::SeqLen(n) => {
                write!(f, "sequence length must be 1..={}, got {}", MAX_SEQ_LEN, n)
            }
            ConfigError::NoAttempts => write!(f, "max_attempts must be at least 1"),
            ConfigError::NoTimeout => write!(f, "input timeout must be non-zero"),
            ConfigError::Geometry { cols, rows } => {
                write!(f, "unsupported LCD geometry {}x{}", cols, rows)
            }
            ConfigError::InvalidPin(p) => write!(f, "pin {} does not exist", p),
            ConfigError::DuplicatePin(p) => write!(f, "pin {} assigned twice", p),
        }
    }
}

/// Game rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Number of colours, codes are 1..=colors
    pub colors: u8,
    /// Pegs per sequence
    pub seqlen: u8,
    /// Rounds before the game is lost
    pub max_attempts: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            colors: 3,
            seqlen: 3,
            max_attempts: 10,
        }
    }
}

impl GameConfig {
    /// Check the rules are playable with fixed-capacity sequences
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors == 0 || self.colors > MAX_COLORS {
            return Err(ConfigError::Colors(self.colors));
        }
        if self.seqlen == 0 || self.seqlen as usize > MAX_SEQ_LEN {
            return Err(ConfigError::SeqLen(self.seqlen));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        Ok(())
    }

    /// Check a single entered or configured digit
    pub fn check_digit(&self, position: usize, digit: u8) -> Result<u8, SequenceError> {
        if (1..=self.colors).contains(&digit) {
            Ok(digit)
        } else {
            Err(SequenceError::InvalidDigit {
                position: position as u8,
                digit,
                colors: self.colors,
            })
        }
    }
}

/// Timing of input waits, feedback and hardware pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Input window per digit (microseconds)
    pub timeout_us: u32,
    /// Settle delay after a detected press (milliseconds)
    pub debounce_ms: u32,
    /// LED on / off time of one blink (milliseconds)
    pub blink_ms: u32,
    /// Pause between scroll frames on the LCD (milliseconds)
    pub scroll_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            timeout_us: 5_000_000,
            debounce_ms: 300,
            blink_ms: 1500,
            scroll_ms: 200,
        }
    }
}

impl TimingConfig {
    /// Validate timing values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_us == 0 {
            return Err(ConfigError::NoTimeout);
        }
        Ok(())
    }
}
