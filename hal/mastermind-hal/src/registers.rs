//! GPIO register block access
//!
//! The BCM2835 family exposes its GPIO controller as a block of 32-bit
//! words. Only the words below are used by the console:
//!
//! | word | byte | register | purpose                         |
//! |------|------|----------|---------------------------------|
//! | 0-5  | 0x00 | GPFSELn  | function select, 10 pins a word |
//! | 7-8  | 0x1C | GPSETn   | write 1 to drive a pin high     |
//! | 10-11| 0x28 | GPCLRn   | write 1 to drive a pin low      |
//! | 13-14| 0x34 | GPLEVn   | current pin levels              |

use core::cell::Cell;

/// Size of the mapped GPIO block in bytes
pub const BLOCK_SIZE: usize = 4 * 1024;

/// Word offsets of the registers inside the block
pub mod offsets {
    /// First function-select word (pins 0-9)
    pub const GPFSEL0: usize = 0;
    /// First output-set word (pins 0-31), byte offset 28
    pub const GPSET0: usize = 7;
    /// First output-clear word (pins 0-31), byte offset 40
    pub const GPCLR0: usize = 10;
    /// First pin-level word (pins 0-31), byte offset 52
    pub const GPLEV0: usize = 13;
}

/// Word-level access to a GPIO register block
///
/// Accessors take `&self`: the block is hardware memory shared by every
/// pin handle, so implementations provide their own interior mutability
/// (volatile access on hardware, `Cell` in simulation).
pub trait Registers {
    /// Read the word at `index`
    fn read_word(&self, index: usize) -> u32;

    /// Write `value` to the word at `index`
    fn write_word(&self, index: usize, value: u32);
}

impl<R: Registers + ?Sized> Registers for &R {
    fn read_word(&self, index: usize) -> u32 {
        (**self).read_word(index)
    }

    fn write_word(&self, index: usize, value: u32) {
        (**self).write_word(index, value)
    }
}

/// Number of words modelled by [`RegisterFile`] (GPFSEL0 through GPLEV1)
pub const REGISTER_FILE_WORDS: usize = 16;

/// In-memory register file
///
/// Models the low words of the GPIO block as plain memory. Writes to the
/// set/clear words are recorded verbatim and do not feed back into the
/// level words; tests drive the level words directly.
pub struct RegisterFile {
    words: [Cell<u32>; REGISTER_FILE_WORDS],
    writes: Cell<usize>,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Create a register file with every word cleared
    pub fn new() -> Self {
        Self {
            words: Default::default(),
            writes: Cell::new(0),
        }
    }

    /// Number of word writes performed so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl Registers for RegisterFile {
    fn read_word(&self, index: usize) -> u32 {
        self.words[index].get()
    }

    fn write_word(&self, index: usize, value: u32) {
        self.words[index].set(value);
        self.writes.set(self.writes.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_file_starts_cleared() {
        let regs = RegisterFile::new();
        for i in 0..REGISTER_FILE_WORDS {
            assert_eq!(regs.read_word(i), 0);
        }
        assert_eq!(regs.write_count(), 0);
    }

    #[test]
    fn test_register_file_through_reference() {
        let regs = RegisterFile::new();
        let by_ref = &regs;
        by_ref.write_word(offsets::GPSET0, 0x8000);
        assert_eq!(regs.read_word(offsets::GPSET0), 0x8000);
        assert_eq!(regs.write_count(), 1);
    }

    #[test]
    fn test_offsets_match_byte_layout() {
        assert_eq!(offsets::GPSET0 * 4, 28);
        assert_eq!(offsets::GPCLR0 * 4, 40);
        assert_eq!(offsets::GPLEV0 * 4, 52);
    }
}
