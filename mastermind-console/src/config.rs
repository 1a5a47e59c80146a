//! Console configuration
//!
//! The deployment settings live in a TOML file with one table per concern.
//! The reference console.toml is compiled in; a file given on the command
//! line replaces it, and any table or key it omits keeps its default.

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use mastermind_core::{GameConfig, LcdConfig, PinMap, TimingConfig};

use crate::error::ConsoleError;

/// Reference configuration, validated by the build script
pub const DEFAULT_CONFIG: &str = include_str!("../console.toml");

/// Board-level settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Physical address of the GPIO register block
    pub gpio_base: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            gpio_base: 0x3F20_0000,
        }
    }
}

/// Complete console configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    pub game: GameConfig,
    pub timing: TimingConfig,
    pub lcd: LcdConfig,
    pub pins: PinMap,
    pub board: BoardConfig,
}

impl ConsoleConfig {
    /// Parse and validate a TOML document
    pub fn parse(text: &str) -> Result<Self, ConsoleError> {
        let config: ConsoleConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or the embedded reference file when `None`
    pub fn load(path: Option<&Path>) -> Result<Self, ConsoleError> {
        match path {
            Some(path) => {
                debug!("loading configuration from {}", path.display());
                let text = fs::read_to_string(path).map_err(|source| {
                    ConsoleError::ReadConfig {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                Self::parse(&text)
            }
            None => Self::parse(DEFAULT_CONFIG),
        }
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConsoleError> {
        self.game.validate()?;
        self.timing.validate()?;
        self.lcd.validate()?;
        self.pins.validate()?;
        Ok(())
    }
}
