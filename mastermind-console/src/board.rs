//! Board wiring
//!
//! Turns a GPIO controller and the pin map into the three console devices.
//! The button line becomes an input; LED and LCD lines are driven low
//! before they switch to outputs so nothing glitches at start-up.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use mastermind_core::traits::{DeviceError, DigitInput};
use mastermind_core::ConfigError;
use mastermind_drivers::{Hd44780, Led, LedPair, PressCounter};
use mastermind_hal::{Deadline, Gpio, GpioPin, Level, Pin, Registers};

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;

/// Console devices sharing one GPIO controller
pub struct Console<'a, R, D, T> {
    pub lcd: Hd44780<GpioPin<'a, R>, D>,
    pub leds: LedPair<GpioPin<'a, R>, D>,
    pub keypad: Keypad<PressCounter<GpioPin<'a, R>, D, T>>,
}

/// Digit input that logs every closed input window
pub struct Keypad<I> {
    input: I,
    windows: u32,
}

impl<I> Keypad<I> {
    pub fn new(input: I) -> Self {
        Self { input, windows: 0 }
    }

    /// Input windows read so far
    pub fn windows(&self) -> u32 {
        self.windows
    }
}

impl<I: DigitInput> DigitInput for Keypad<I> {
    fn read_count(&mut self) -> Result<u8, DeviceError> {
        let count = self.input.read_count()?;
        self.windows += 1;
        debug!("input window {} closed with {} presses", self.windows, count);
        Ok(count)
    }
}

fn line(index: u8) -> Result<Pin, ConsoleError> {
    Pin::new(index).ok_or(ConsoleError::Config(ConfigError::InvalidPin(index)))
}

/// Configure every console line and bring up the devices
///
/// The LCD runs its power-up handshake here, so the display is blank and
/// ready when this returns.
pub fn wire<'a, R, D, T>(
    gpio: &'a Gpio<R>,
    config: &ConsoleConfig,
    delay: D,
    deadline: T,
) -> Result<Console<'a, R, D, T>, ConsoleError>
where
    R: Registers,
    D: DelayNs + Clone,
    T: Deadline,
{
    let pins = &config.pins;
    let output = move |index: u8| -> Result<GpioPin<'a, R>, ConsoleError> {
        Ok(gpio.output(line(index)?, Level::Low))
    };

    let button = gpio.input(line(pins.button)?);
    let green = Led::new(output(pins.led_green)?).unwrap_or_else(|never| match never {});
    let red = Led::new(output(pins.led_red)?).unwrap_or_else(|never| match never {});

    let [d4, d5, d6, d7] = pins.lcd_data;
    let data = [output(d4)?, output(d5)?, output(d6)?, output(d7)?];
    let mut lcd = Hd44780::new(
        output(pins.lcd_rs)?,
        output(pins.lcd_strobe)?,
        data,
        &config.lcd,
        delay.clone(),
    )?
    .with_scroll_delay(config.timing.scroll_ms);
    lcd.init()?;
    info!(
        "LCD ready: {}x{} on a {}-bit bus",
        config.lcd.cols, config.lcd.rows, config.lcd.bits
    );

    let leds = LedPair::new(green, red, delay.clone()).with_blink_time(config.timing.blink_ms);
    let counter = PressCounter::new(button, delay, deadline)
        .with_timeout(config.timing.timeout_us)
        .with_debounce(config.timing.debounce_ms);
    debug!(
        "button on GPIO {}, input window {} us",
        pins.button,
        counter.timeout_us()
    );

    Ok(Console {
        lcd,
        leds,
        keypad: Keypad::new(counter),
    })
}
