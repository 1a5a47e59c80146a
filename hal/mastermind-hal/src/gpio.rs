//! GPIO pin abstractions
//!
//! Pin-level primitives on top of a [`Registers`] block: function select,
//! level write through the set/clear words, and level read.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::registers::{offsets, Registers};

/// Number of GPIO lines on the BCM2835 family
pub const GPIO_COUNT: u8 = 54;

/// A validated GPIO line number (BCM numbering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(u8);

impl Pin {
    /// Create a pin handle, rejecting indices the controller does not have
    pub const fn new(index: u8) -> Option<Self> {
        if index < GPIO_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Physical line number
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Function-select word holding this pin's 3-bit field
    const fn fsel_word(self) -> usize {
        offsets::GPFSEL0 + (self.0 / 10) as usize
    }

    /// Bit position of this pin's field inside its function-select word
    const fn fsel_shift(self) -> u32 {
        (self.0 % 10) as u32 * 3
    }

    /// Bank (0 or 1) of the set/clear/level word pairs
    const fn bank(self) -> usize {
        (self.0 / 32) as usize
    }

    /// Single-bit mask inside the bank word
    const fn mask(self) -> u32 {
        1 << (self.0 % 32)
    }
}

/// Pin direction, encoded as the function-select value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Direction {
    Input = 0b000,
    Output = 0b001,
}

/// Logic level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Check for logic 1
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// GPIO controller over a register block
///
/// All operations after construction are infallible: the pin index was
/// validated when the [`Pin`] was built.
pub struct Gpio<R> {
    regs: R,
}

impl<R: Registers> Gpio<R> {
    /// Wrap a register block
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Access the underlying register block
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Set the direction of `pin`
    ///
    /// Read-modify-write of the function-select word: only the pin's own
    /// 3-bit field changes, the nine neighbours packed in the same word
    /// keep their configuration.
    pub fn set_mode(&self, pin: Pin, direction: Direction) {
        let word = pin.fsel_word();
        let shift = pin.fsel_shift();
        let mut value = self.regs.read_word(word);
        value &= !(0b111 << shift);
        value |= (direction as u32) << shift;
        self.regs.write_word(word, value);
    }

    /// Drive `pin` to `level`
    ///
    /// A single store of the pin's bit into the set or clear word; the
    /// hardware applies it atomically, so there is no read-modify-write.
    pub fn write(&self, pin: Pin, level: Level) {
        let base = match level {
            Level::High => offsets::GPSET0,
            Level::Low => offsets::GPCLR0,
        };
        self.regs.write_word(base + pin.bank(), pin.mask());
    }

    /// Read the current level of `pin`
    pub fn read(&self, pin: Pin) -> Level {
        let word = self.regs.read_word(offsets::GPLEV0 + pin.bank());
        Level::from(word & pin.mask() != 0)
    }

    /// Configure `pin` as an output, driving `initial` before switching mode
    pub fn output(&self, pin: Pin, initial: Level) -> GpioPin<'_, R> {
        self.write(pin, initial);
        self.set_mode(pin, Direction::Output);
        GpioPin { gpio: self, pin }
    }

    /// Configure `pin` as an input
    pub fn input(&self, pin: Pin) -> GpioPin<'_, R> {
        self.set_mode(pin, Direction::Input);
        GpioPin { gpio: self, pin }
    }
}

/// Handle to one configured line of a [`Gpio`] controller
///
/// Many handles share one register block; each only ever touches its own
/// bit, so handles are freely usable side by side.
pub struct GpioPin<'a, R> {
    gpio: &'a Gpio<R>,
    pin: Pin,
}

impl<R: Registers> GpioPin<'_, R> {
    /// Line number of this handle
    pub fn pin(&self) -> Pin {
        self.pin
    }

    /// Read the line level
    pub fn level(&self) -> Level {
        self.gpio.read(self.pin)
    }
}

impl<R> ErrorType for GpioPin<'_, R> {
    type Error = Infallible;
}

impl<R: Registers> OutputPin for GpioPin<'_, R> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.gpio.write(self.pin, Level::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.gpio.write(self.pin, Level::High);
        Ok(())
    }
}

impl<R: Registers> InputPin for GpioPin<'_, R> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level().is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level().is_high())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::RegisterFile;

    fn pin(n: u8) -> Pin {
        Pin::new(n).unwrap()
    }

    #[test]
    fn test_pin_validation() {
        assert!(Pin::new(0).is_some());
        assert!(Pin::new(53).is_some());
        assert!(Pin::new(54).is_none());
        assert!(Pin::new(255).is_none());
    }

    #[test]
    fn test_set_mode_preserves_neighbours() {
        let gpio = Gpio::new(RegisterFile::new());
        // Every field of word 1 (pins 10-19) set to 0b111
        gpio.registers().write_word(1, 0x3FFF_FFFF);

        gpio.set_mode(pin(13), Direction::Output);

        let word = gpio.registers().read_word(1);
        assert_eq!((word >> 9) & 0b111, 0b001);
        assert_eq!(word & !(0b111 << 9), 0x3FFF_FFFF & !(0b111 << 9));
    }

    #[test]
    fn test_set_mode_input_clears_field() {
        let gpio = Gpio::new(RegisterFile::new());
        gpio.set_mode(pin(19), Direction::Output);
        gpio.set_mode(pin(10), Direction::Output);
        assert_eq!(gpio.registers().read_word(1), (1 << 27) | 1);

        gpio.set_mode(pin(19), Direction::Input);
        assert_eq!(gpio.registers().read_word(1), 1);
    }

    #[test]
    fn test_function_select_word_per_ten_pins() {
        let gpio = Gpio::new(RegisterFile::new());
        gpio.set_mode(pin(5), Direction::Output);
        gpio.set_mode(pin(25), Direction::Output);
        assert_eq!(gpio.registers().read_word(0), 1 << 15);
        assert_eq!(gpio.registers().read_word(2), 1 << 15);
    }

    #[test]
    fn test_write_uses_set_and_clear_words() {
        let gpio = Gpio::new(RegisterFile::new());

        gpio.write(pin(13), Level::High);
        assert_eq!(gpio.registers().read_word(offsets::GPSET0), 1 << 13);
        assert_eq!(gpio.registers().read_word(offsets::GPCLR0), 0);

        gpio.write(pin(5), Level::Low);
        assert_eq!(gpio.registers().read_word(offsets::GPCLR0), 1 << 5);

        // Level word is never written
        assert_eq!(gpio.registers().read_word(offsets::GPLEV0), 0);
        assert_eq!(gpio.registers().write_count(), 2);
    }

    #[test]
    fn test_second_bank() {
        let gpio = Gpio::new(RegisterFile::new());
        gpio.write(pin(40), Level::High);
        assert_eq!(gpio.registers().read_word(offsets::GPSET0 + 1), 1 << 8);
    }

    #[test]
    fn test_read_level() {
        let gpio = Gpio::new(RegisterFile::new());
        gpio.registers().write_word(offsets::GPLEV0, 1 << 19);
        assert_eq!(gpio.read(pin(19)), Level::High);
        assert_eq!(gpio.read(pin(18)), Level::Low);
    }

    #[test]
    fn test_output_drives_initial_level_before_mode() {
        let gpio = Gpio::new(RegisterFile::new());
        let mut out = gpio.output(pin(24), Level::Low);
        assert_eq!(gpio.registers().read_word(offsets::GPCLR0), 1 << 24);
        assert_eq!(gpio.registers().read_word(2), 1 << 12);

        out.set_high().unwrap();
        assert_eq!(gpio.registers().read_word(offsets::GPSET0), 1 << 24);
    }

    #[test]
    fn test_input_pin_reads_level() {
        let gpio = Gpio::new(RegisterFile::new());
        let mut button = gpio.input(pin(19));
        assert!(button.is_low().unwrap());

        gpio.registers().write_word(offsets::GPLEV0, 1 << 19);
        assert!(button.is_high().unwrap());
        assert_eq!(button.pin(), pin(19));
    }
}
