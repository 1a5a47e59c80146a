//! Hardware configuration types
//!
//! LCD geometry and the BCM pin assignment of the console peripherals.

use heapless::FnvIndexSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::ConfigError;

/// Number of GPIO lines a pin number may refer to (BCM2835 family)
pub const GPIO_COUNT: u8 = 54;

/// Longest line an HD44780 controller addresses
pub const MAX_LCD_COLS: u8 = 40;

/// LCD geometry and bus width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LcdConfig {
    /// Data bus width (only 4 is wired)
    pub bits: u8,
    /// Characters per row
    pub cols: u8,
    /// Rows
    pub rows: u8,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            bits: 4,
            cols: 16,
            rows: 2,
        }
    }
}

impl LcdConfig {
    /// Validate the geometry
    ///
    /// Bus width is checked by the driver, which owns that constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cols_ok = (1..=MAX_LCD_COLS).contains(&self.cols);
        let rows_ok = (1..=2).contains(&self.rows);
        if cols_ok && rows_ok {
            Ok(())
        } else {
            Err(ConfigError::Geometry {
                cols: self.cols,
                rows: self.rows,
            })
        }
    }
}

/// Pin assignment (BCM numbering)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinMap {
    /// Push button (input)
    pub button: u8,
    /// Green LED, used for counts
    pub led_green: u8,
    /// Red LED, used for separators and acknowledgements
    pub led_red: u8,
    /// LCD strobe (E)
    pub lcd_strobe: u8,
    /// LCD register select (RS)
    pub lcd_rs: u8,
    /// LCD data lines D4..D7
    pub lcd_data: [u8; 4],
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            button: 19,
            led_green: 13,
            led_red: 5,
            lcd_strobe: 24,
            lcd_rs: 25,
            lcd_data: [23, 10, 27, 22],
        }
    }
}

impl PinMap {
    /// Every assigned pin, button first
    pub fn all(&self) -> [u8; 9] {
        let d = self.lcd_data;
        [
            self.button,
            self.led_green,
            self.led_red,
            self.lcd_strobe,
            self.lcd_rs,
            d[0],
            d[1],
            d[2],
            d[3],
        ]
    }

    /// Check every pin exists and none is assigned twice
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: FnvIndexSet<u8, 16> = FnvIndexSet::new();
        for pin in self.all() {
            if pin >= GPIO_COUNT {
                return Err(ConfigError::InvalidPin(pin));
            }
            match seen.insert(pin) {
                Ok(true) => {}
                _ => return Err(ConfigError::DuplicatePin(pin)),
            }
        }
        Ok(())
    }
}
