//! HD44780 character LCD over a 4-bit bus
//!
//! Write-only driver: the R/W line is tied low, so the busy flag is never
//! read and every instruction is followed by a fixed execution pause. The
//! cursor position is tracked in memory and mirrors the controller's
//! address counter.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use mastermind_core::config::LcdConfig;
use mastermind_core::traits::{DeviceError, TextDisplay};

use super::cmd;

/// Settle time after power-up and after each function-set (ms)
const SETTLE_MS: u32 = 35;
/// Strobe high and low hold time (µs)
const STROBE_HOLD_US: u32 = 50;
/// Execution pause after a command (ms)
const COMMAND_MS: u32 = 2;
/// Extra pause after clear / home (ms)
const HOME_MS: u32 = 5;
/// Default pause between scroll frames (ms)
const SCROLL_MS: u32 = 200;

/// Errors from the LCD driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError<E> {
    /// A control or data pin could not be driven
    Pin(E),
    /// Only the 4-bit bus is wired
    UnsupportedBusWidth(u8),
    /// Geometry the controller cannot address
    UnsupportedGeometry { cols: u8, rows: u8 },
}

impl<E: fmt::Debug> fmt::Display for LcdError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LcdError::Pin(e) => write!(f, "LCD pin error: {:?}", e),
            LcdError::UnsupportedBusWidth(bits) => {
                write!(f, "only a 4-bit LCD bus is supported, got {}", bits)
            }
            LcdError::UnsupportedGeometry { cols, rows } => {
                write!(f, "unsupported LCD geometry {}x{}", cols, rows)
            }
        }
    }
}

/// HD44780 driver
pub struct Hd44780<P, D> {
    rs: P,
    strobe: P,
    /// D4..D7; data pin i carries bit i of a nibble
    data: [P; 4],
    delay: D,
    cols: u8,
    rows: u8,
    /// Cursor column
    cx: u8,
    /// Cursor row
    cy: u8,
    /// Display / cursor / blink bits of the display-control instruction
    control: u8,
    scroll_ms: u32,
}

impl<P, D> Hd44780<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Create a driver for an attached display
    ///
    /// The pins must already be outputs. Nothing is sent until
    /// [`init`](Self::init).
    pub fn new(
        rs: P,
        strobe: P,
        data: [P; 4],
        lcd: &LcdConfig,
        delay: D,
    ) -> Result<Self, LcdError<P::Error>> {
        if lcd.bits != 4 {
            return Err(LcdError::UnsupportedBusWidth(lcd.bits));
        }
        if lcd.validate().is_err() {
            return Err(LcdError::UnsupportedGeometry {
                cols: lcd.cols,
                rows: lcd.rows,
            });
        }

        Ok(Self {
            rs,
            strobe,
            data,
            delay,
            cols: lcd.cols,
            rows: lcd.rows,
            cx: 0,
            cy: 0,
            control: 0,
            scroll_ms: SCROLL_MS,
        })
    }

    /// Set the pause between scroll frames
    pub fn with_scroll_delay(mut self, ms: u32) -> Self {
        self.scroll_ms = ms;
        self
    }

    /// Run the power-up handshake and configure the display
    ///
    /// The controller must see the 8-bit function-set three times before
    /// it reliably accepts the switch to 4-bit mode.
    pub fn init(&mut self) -> Result<(), LcdError<P::Error>> {
        self.rs.set_low().map_err(LcdError::Pin)?;
        self.strobe.set_low().map_err(LcdError::Pin)?;
        self.write_nibble(0)?;
        self.delay.delay_ms(SETTLE_MS);

        let mut func = cmd::FUNC | cmd::FUNC_DL;
        for _ in 0..3 {
            self.put4_command(func >> 4)?;
            self.delay.delay_ms(SETTLE_MS);
        }
        func = cmd::FUNC;
        self.put4_command(func >> 4)?;
        self.delay.delay_ms(SETTLE_MS);

        if self.rows > 1 {
            func |= cmd::FUNC_N;
            self.command(func)?;
            self.delay.delay_ms(SETTLE_MS);
        }

        self.set_display(true)?;
        self.set_cursor(false)?;
        self.set_blink(false)?;
        self.clear()?;
        self.command(cmd::ENTRY | cmd::ENTRY_ID)?;
        self.command(cmd::CDSHIFT | cmd::CDSHIFT_RL)
    }

    /// Current cursor as (column, row)
    pub fn cursor(&self) -> (u8, u8) {
        (self.cx, self.cy)
    }

    /// Columns and rows
    pub fn geometry(&self) -> (u8, u8) {
        (self.cols, self.rows)
    }

    /// Send one instruction
    pub fn command(&mut self, command: u8) -> Result<(), LcdError<P::Error>> {
        self.rs.set_low().map_err(LcdError::Pin)?;
        self.send_byte(command)?;
        self.delay.delay_ms(COMMAND_MS);
        Ok(())
    }

    /// Write one character at the cursor and advance it
    ///
    /// Wraps to the start of the next row at the end of a row, and from
    /// the last row back to the first. There is no scrolling.
    pub fn put_char(&mut self, c: u8) -> Result<(), LcdError<P::Error>> {
        self.rs.set_high().map_err(LcdError::Pin)?;
        self.send_byte(c)?;

        self.cx += 1;
        if self.cx == self.cols {
            self.cx = 0;
            self.cy += 1;
            if self.cy == self.rows {
                self.cy = 0;
            }
            self.command(address(self.cx, self.cy))?;
        }
        Ok(())
    }

    /// Write a string at the cursor
    pub fn puts(&mut self, s: &str) -> Result<(), LcdError<P::Error>> {
        self.put_bytes(s.as_bytes())
    }

    /// Move the cursor; positions outside the display are ignored
    pub fn position(&mut self, x: u8, y: u8) -> Result<(), LcdError<P::Error>> {
        if x >= self.cols || y >= self.rows {
            return Ok(());
        }
        self.command(address(x, y))?;
        self.cx = x;
        self.cy = y;
        Ok(())
    }

    /// Return the cursor to (0, 0) without clearing
    pub fn home(&mut self) -> Result<(), LcdError<P::Error>> {
        self.command(cmd::HOME)?;
        self.cx = 0;
        self.cy = 0;
        self.delay.delay_ms(HOME_MS);
        Ok(())
    }

    /// Blank the display and return the cursor to (0, 0)
    pub fn clear(&mut self) -> Result<(), LcdError<P::Error>> {
        self.command(cmd::CLEAR)?;
        self.command(cmd::HOME)?;
        self.cx = 0;
        self.cy = 0;
        self.delay.delay_ms(HOME_MS);
        Ok(())
    }

    /// Turn the display on or off
    pub fn set_display(&mut self, on: bool) -> Result<(), LcdError<P::Error>> {
        self.update_control(cmd::DISPLAY_CTRL, on)
    }

    /// Show or hide the underline cursor
    pub fn set_cursor(&mut self, on: bool) -> Result<(), LcdError<P::Error>> {
        self.update_control(cmd::CURSOR_CTRL, on)
    }

    /// Enable or disable the blinking block cursor
    pub fn set_blink(&mut self, on: bool) -> Result<(), LcdError<P::Error>> {
        self.update_control(cmd::BLINK_CTRL, on)
    }

    /// Show `message` on `row`
    ///
    /// A message wider than the display scrolls right to left one
    /// character per frame until its tail has been shown once.
    pub fn print(&mut self, message: &str, row: u8) -> Result<(), LcdError<P::Error>> {
        let bytes = message.as_bytes();
        let width = self.cols as usize;

        if bytes.len() <= width {
            self.position(0, row)?;
            return self.put_bytes(bytes);
        }

        for window in bytes.windows(width) {
            self.position(0, row)?;
            self.put_bytes(window)?;
            self.delay.delay_ms(self.scroll_ms);
        }
        Ok(())
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> Result<(), LcdError<P::Error>> {
        for &b in bytes {
            self.put_char(b)?;
        }
        Ok(())
    }

    fn update_control(&mut self, flag: u8, on: bool) -> Result<(), LcdError<P::Error>> {
        if on {
            self.control |= flag;
        } else {
            self.control &= !flag;
        }
        self.command(cmd::CTRL | self.control)
    }

    /// Send a byte as two nibbles, high nibble first
    fn send_byte(&mut self, byte: u8) -> Result<(), LcdError<P::Error>> {
        self.write_nibble(byte >> 4)?;
        self.pulse_strobe()?;
        self.write_nibble(byte & 0x0F)?;
        self.pulse_strobe()
    }

    /// Half-byte instruction, used only before 4-bit mode is active
    fn put4_command(&mut self, nibble: u8) -> Result<(), LcdError<P::Error>> {
        self.rs.set_low().map_err(LcdError::Pin)?;
        self.write_nibble(nibble)?;
        self.pulse_strobe()
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), LcdError<P::Error>> {
        for (i, pin) in self.data.iter_mut().enumerate() {
            let bit = (nibble >> i) & 1 == 1;
            pin.set_state(PinState::from(bit)).map_err(LcdError::Pin)?;
        }
        Ok(())
    }

    /// Data is latched on the falling edge
    fn pulse_strobe(&mut self) -> Result<(), LcdError<P::Error>> {
        self.strobe.set_high().map_err(LcdError::Pin)?;
        self.delay.delay_us(STROBE_HOLD_US);
        self.strobe.set_low().map_err(LcdError::Pin)?;
        self.delay.delay_us(STROBE_HOLD_US);
        Ok(())
    }
}

/// Set-DDRAM-address instruction for a cursor position
fn address(x: u8, y: u8) -> u8 {
    let row_offset = if y > 0 { cmd::ROW1_OFFSET } else { 0 };
    (cmd::DGRAM | row_offset) + x
}

impl<P, D> TextDisplay for Hd44780<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    fn clear(&mut self) -> Result<(), DeviceError> {
        Hd44780::clear(self).map_err(|_| DeviceError::Display)
    }

    fn print(&mut self, message: &str, row: u8) -> Result<(), DeviceError> {
        Hd44780::print(self, message, row).map_err(|_| DeviceError::Display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::cell::RefCell;
    use std::rc::Rc;

    const RS: usize = 0;
    const STROBE: usize = 1;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Op {
        Set(usize, bool),
        DelayUs(u32),
        DelayMs(u32),
    }

    type Log = Rc<RefCell<Vec<Op>>>;

    /// Pin recording every level change into a shared log
    struct MockPin {
        id: usize,
        log: Log,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.log.borrow_mut().push(Op::Set(self.id, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.log.borrow_mut().push(Op::Set(self.id, true));
            Ok(())
        }
    }

    struct MockDelay {
        log: Log,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.log.borrow_mut().push(Op::DelayUs(ns / 1000));
        }

        fn delay_us(&mut self, us: u32) {
            self.log.borrow_mut().push(Op::DelayUs(us));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Op::DelayMs(ms));
        }
    }

    fn lcd_with(config: &LcdConfig) -> (Hd44780<MockPin, MockDelay>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let pin = |id| MockPin {
            id,
            log: log.clone(),
        };
        let lcd = Hd44780::new(
            pin(RS),
            pin(STROBE),
            [pin(2), pin(3), pin(4), pin(5)],
            config,
            MockDelay { log: log.clone() },
        )
        .unwrap();
        (lcd, log)
    }

    fn lcd() -> (Hd44780<MockPin, MockDelay>, Log) {
        lcd_with(&LcdConfig::default())
    }

    /// Decode (register select, nibble) at every falling strobe edge
    fn nibbles(log: &Log) -> Vec<(bool, u8)> {
        let mut levels = [false; 6];
        let mut out = Vec::new();
        for op in log.borrow().iter() {
            if let Op::Set(id, high) = *op {
                let was_high = levels[id];
                levels[id] = high;
                if id == STROBE && was_high && !high {
                    let nibble = (0..4).fold(0u8, |n, i| n | ((levels[2 + i] as u8) << i));
                    out.push((levels[RS], nibble));
                }
            }
        }
        out
    }

    /// Pair nibbles into bytes, high nibble first
    fn bytes(nibbles: &[(bool, u8)]) -> Vec<(bool, u8)> {
        nibbles
            .chunks(2)
            .map(|pair| (pair[0].0, (pair[0].1 << 4) | pair[1].1))
            .collect()
    }

    fn commands(log: &Log) -> Vec<u8> {
        bytes(&nibbles(log))
            .into_iter()
            .filter(|(rs, _)| !rs)
            .map(|(_, b)| b)
            .collect()
    }

    fn chars(log: &Log) -> Vec<u8> {
        bytes(&nibbles(log))
            .into_iter()
            .filter(|(rs, _)| *rs)
            .map(|(_, b)| b)
            .collect()
    }

    #[test]
    fn test_rejects_eight_bit_bus() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let pin = |id| MockPin {
            id,
            log: log.clone(),
        };
        let config = LcdConfig {
            bits: 8,
            ..Default::default()
        };
        let result = Hd44780::new(
            pin(0),
            pin(1),
            [pin(2), pin(3), pin(4), pin(5)],
            &config,
            MockDelay { log: log.clone() },
        );
        assert!(matches!(result, Err(LcdError::UnsupportedBusWidth(8))));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_init_sequence() {
        let (mut lcd, log) = lcd();
        lcd.init().unwrap();

        let sent = nibbles(&log);
        assert!(sent.iter().all(|(rs, _)| !rs));

        let handshake: Vec<u8> = sent[..4].iter().map(|(_, n)| *n).collect();
        assert_eq!(handshake, [0x3, 0x3, 0x3, 0x2]);

        let configured: Vec<u8> = bytes(&sent[4..]).into_iter().map(|(_, b)| b).collect();
        assert_eq!(
            configured,
            [0x28, 0x0C, 0x0C, 0x0C, 0x01, 0x02, 0x06, 0x14]
        );
        assert_eq!(lcd.cursor(), (0, 0));
    }

    #[test]
    fn test_init_settle_delays() {
        let (mut lcd, log) = lcd();
        lcd.init().unwrap();

        let settles = log
            .borrow()
            .iter()
            .filter(|op| **op == Op::DelayMs(SETTLE_MS))
            .count();
        // Power-up, four function-sets as nibbles, one two-line function-set
        assert_eq!(settles, 6);
    }

    #[test]
    fn test_single_row_skips_two_line_function_set() {
        let (mut lcd, log) = lcd_with(&LcdConfig {
            bits: 4,
            cols: 16,
            rows: 1,
        });
        lcd.init().unwrap();

        let configured: Vec<u8> = bytes(&nibbles(&log)[4..])
            .into_iter()
            .map(|(_, b)| b)
            .collect();
        assert_eq!(configured, [0x0C, 0x0C, 0x0C, 0x01, 0x02, 0x06, 0x14]);
    }

    #[test]
    fn test_strobe_timing() {
        let (mut lcd, log) = lcd();
        lcd.command(cmd::HOME).unwrap();

        let ops = log.borrow();
        let high = ops
            .iter()
            .position(|op| *op == Op::Set(STROBE, true))
            .unwrap();
        assert_eq!(ops[high + 1], Op::DelayUs(50));
        assert_eq!(ops[high + 2], Op::Set(STROBE, false));
        assert_eq!(ops[high + 3], Op::DelayUs(50));
        assert_eq!(*ops.last().unwrap(), Op::DelayMs(COMMAND_MS));
    }

    #[test]
    fn test_data_pin_carries_nibble_bit() {
        let (mut lcd, log) = lcd();
        lcd.put_char(b'A').unwrap();

        // 'A' = 0x41
        assert_eq!(nibbles(&log), [(true, 0x4), (true, 0x1)]);
    }

    #[test]
    fn test_puts_writes_characters_at_cursor() {
        let (mut lcd, log) = lcd();
        lcd.puts("Hi!").unwrap();

        assert_eq!(chars(&log), b"Hi!");
        assert!(commands(&log).is_empty());
        assert_eq!(lcd.cursor(), (3, 0));
    }

    #[test]
    fn test_puts_continues_on_next_row() {
        let (mut lcd, log) = lcd();
        lcd.position(14, 0).unwrap();
        log.borrow_mut().clear();

        lcd.puts("abcd").unwrap();

        assert_eq!(chars(&log), b"abcd");
        // Row change after the 16th column moves the address counter
        assert_eq!(commands(&log), [0xC0]);
        assert_eq!(lcd.cursor(), (2, 1));
    }

    #[test]
    fn test_cursor_wraps_full_display() {
        let (mut lcd, _log) = lcd();
        for _ in 0..32 {
            lcd.put_char(b'x').unwrap();
        }
        assert_eq!(lcd.cursor(), (0, 0));

        lcd.put_char(b'x').unwrap();
        assert_eq!(lcd.cursor(), (1, 0));
    }

    #[test]
    fn test_wrap_readdresses_next_row() {
        let (mut lcd, log) = lcd();
        for _ in 0..16 {
            lcd.put_char(b'x').unwrap();
        }
        assert_eq!(lcd.cursor(), (0, 1));
        assert_eq!(commands(&log), [0xC0]);
    }

    #[test]
    fn test_position() {
        let (mut lcd, log) = lcd();
        lcd.position(5, 1).unwrap();
        assert_eq!(lcd.cursor(), (5, 1));
        assert_eq!(commands(&log), [0x80 | 0x40 | 5]);
    }

    #[test]
    fn test_position_out_of_range_ignored() {
        let (mut lcd, log) = lcd();
        lcd.position(3, 0).unwrap();
        log.borrow_mut().clear();

        lcd.position(16, 0).unwrap();
        lcd.position(0, 2).unwrap();
        assert!(log.borrow().is_empty());
        assert_eq!(lcd.cursor(), (3, 0));
    }

    #[test]
    fn test_home_and_clear_reset_cursor() {
        let (mut lcd, log) = lcd();
        lcd.position(7, 1).unwrap();
        lcd.home().unwrap();
        assert_eq!(lcd.cursor(), (0, 0));

        lcd.position(7, 1).unwrap();
        log.borrow_mut().clear();
        lcd.clear().unwrap();
        assert_eq!(lcd.cursor(), (0, 0));
        assert_eq!(commands(&log), [0x01, 0x02]);
    }

    #[test]
    fn test_display_control_register() {
        let (mut lcd, log) = lcd();
        lcd.set_display(true).unwrap();
        lcd.set_cursor(true).unwrap();
        lcd.set_blink(true).unwrap();
        lcd.set_cursor(false).unwrap();
        assert_eq!(commands(&log), [0x0C, 0x0E, 0x0F, 0x0D]);
    }

    #[test]
    fn test_print_fitting_message() {
        let (mut lcd, log) = lcd();
        lcd.print("Go!", 1).unwrap();

        assert_eq!(commands(&log), [0xC0]);
        assert_eq!(chars(&log), b"Go!");
        assert_eq!(lcd.cursor(), (3, 1));
    }

    #[test]
    fn test_print_scrolls_long_message() {
        let (mut lcd, log) = lcd();
        let message = "Please input a number from 1 to 3";
        lcd.print(message, 0).unwrap();

        let frames = message.len() - 16 + 1;
        let pauses = log
            .borrow()
            .iter()
            .filter(|op| **op == Op::DelayMs(SCROLL_MS))
            .count();
        assert_eq!(pauses, frames);

        let written = chars(&log);
        assert_eq!(written.len(), frames * 16);
        assert_eq!(&written[..16], &message.as_bytes()[..16]);
        assert_eq!(&written[written.len() - 16..], &message.as_bytes()[frames - 1..]);
    }

    #[test]
    fn test_scroll_delay_configurable() {
        let (lcd, log) = lcd();
        let mut lcd = lcd.with_scroll_delay(10);
        lcd.print("0123456789abcdefg", 0).unwrap();

        let pauses = log
            .borrow()
            .iter()
            .filter(|op| **op == Op::DelayMs(10))
            .count();
        assert_eq!(pauses, 2);
    }

    #[test]
    fn test_text_display_trait() {
        let (mut lcd, log) = lcd();

        fn show<T: TextDisplay>(t: &mut T) {
            t.clear().unwrap();
            t.print("Hi", 0).unwrap();
        }

        show(&mut lcd);
        assert_eq!(chars(&log), b"Hi");
    }
}
