//! Character LCD drivers

pub mod hd44780;

pub use hd44780::{Hd44780, LcdError};

/// HD44780 instruction set
#[allow(dead_code)]
pub(crate) mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    pub const ENTRY: u8 = 0x04;
    pub const CTRL: u8 = 0x08;
    pub const CDSHIFT: u8 = 0x10;
    pub const FUNC: u8 = 0x20;
    pub const CGRAM: u8 = 0x40;
    pub const DGRAM: u8 = 0x80;

    // Entry mode flags
    pub const ENTRY_SH: u8 = 0x01;
    pub const ENTRY_ID: u8 = 0x02;

    // Display control flags
    pub const BLINK_CTRL: u8 = 0x01;
    pub const CURSOR_CTRL: u8 = 0x02;
    pub const DISPLAY_CTRL: u8 = 0x04;

    // Function set flags
    pub const FUNC_F: u8 = 0x04;
    pub const FUNC_N: u8 = 0x08;
    pub const FUNC_DL: u8 = 0x10;

    // Cursor/display shift flags
    pub const CDSHIFT_RL: u8 = 0x04;

    /// DDRAM address offset of the second row
    pub const ROW1_OFFSET: u8 = 0x40;
}
