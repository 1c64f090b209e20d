//! TM1638 LED&KEY panel driver
//!
//! Several panels share one data line (DIO) and one clock line (CLK); each
//! panel has its own strobe (STB). The shared lines live in a
//! [`Tm1638Bus`] behind a `RefCell`, and every panel gets a [`Tm1638`]
//! handle holding a reference to the bus plus its own strobe pin.
//!
//! Wire format: strobe low starts a frame, bytes go out LSB first and are
//! latched on the rising clock edge, strobe high ends the frame.
//!
//! Display memory is 16 bytes: even addresses hold digit segments, odd
//! addresses the bicolor LED under that digit.

pub mod font;

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use scifi_core::traits::PanelDriver;
use scifi_core::DIGIT_COUNT;
use scifi_protocol::Color;

/// TM1638 command bytes
mod cmd {
    /// Write display memory, address auto-increment
    pub const WRITE_AUTO: u8 = 0x40;
    /// Write display memory, fixed address
    pub const WRITE_FIXED: u8 = 0x44;
    /// Read key scan data
    pub const READ_KEYS: u8 = 0x42;
    /// Display control; bit 3 turns the display on, bits 0-2 set pulse width
    pub const DISPLAY_CONTROL: u8 = 0x80;
    pub const DISPLAY_ON: u8 = 0x08;
    /// Set address, OR'ed with 0x00-0x0F
    pub const ADDRESS: u8 = 0xC0;
}

/// LED register values
const LED_RED: u8 = 0x01;
const LED_GREEN: u8 = 0x02;

/// Key scan bytes returned by READ_KEYS
const KEY_BYTES: usize = 4;

/// Half clock period; the chip is specified up to 1 MHz
const HALF_PERIOD_US: u32 = 1;

/// Display control byte for brightness 0 (off) to 8 (max)
pub fn display_control(level: u8) -> u8 {
    match level {
        0 => cmd::DISPLAY_CONTROL,
        level => cmd::DISPLAY_CONTROL | cmd::DISPLAY_ON | (level.min(8) - 1),
    }
}

/// Fold the four key scan bytes into one bit per button
///
/// Byte `i` carries buttons `i` (bit 0) and `i + 4` (bit 4).
pub fn fold_keys(scan: [u8; KEY_BYTES]) -> u8 {
    scan.iter()
        .enumerate()
        .fold(0, |keys, (i, byte)| keys | ((byte & 0x11) << i))
}

fn led_value(color: Option<Color>) -> u8 {
    match color {
        None => 0,
        Some(Color::Red) => LED_RED,
        Some(Color::Green) => LED_GREEN,
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Data and clock lines shared by every panel on the chain
///
/// DIO must be open drain (or otherwise readable while driven high) so the
/// chip can answer key scans.
pub struct Tm1638Bus<CLK, DIO, DL> {
    clk: CLK,
    dio: DIO,
    delay: DL,
}

impl<CLK, DIO, DL> Tm1638Bus<CLK, DIO, DL>
where
    CLK: OutputPin + ErrorType<Error = Infallible>,
    DIO: OutputPin + InputPin + ErrorType<Error = Infallible>,
    DL: DelayNs,
{
    /// Take the shared lines and idle them high
    pub fn new(clk: CLK, dio: DIO, delay: DL) -> Self {
        let mut bus = Self { clk, dio, delay };
        infallible(bus.clk.set_high());
        infallible(bus.dio.set_high());
        bus
    }

    fn write_byte(&mut self, byte: u8) {
        for bit in 0..8 {
            infallible(self.clk.set_low());
            if byte & (1 << bit) != 0 {
                infallible(self.dio.set_high());
            } else {
                infallible(self.dio.set_low());
            }
            self.delay.delay_us(HALF_PERIOD_US);
            infallible(self.clk.set_high());
            self.delay.delay_us(HALF_PERIOD_US);
        }
    }

    fn read_byte(&mut self) -> u8 {
        let mut byte = 0;
        for bit in 0..8 {
            infallible(self.clk.set_low());
            self.delay.delay_us(HALF_PERIOD_US);
            if infallible(self.dio.is_high()) {
                byte |= 1 << bit;
            }
            infallible(self.clk.set_high());
            self.delay.delay_us(HALF_PERIOD_US);
        }
        byte
    }

    /// Release DIO so the chip can drive it
    fn release(&mut self) {
        infallible(self.dio.set_high());
        self.delay.delay_us(HALF_PERIOD_US);
    }
}

/// One panel on a shared [`Tm1638Bus`]
///
/// Keeps a copy of display memory so text and LED updates can be written
/// together in one frame.
pub struct Tm1638<'a, STB, CLK, DIO, DL> {
    bus: &'a RefCell<Tm1638Bus<CLK, DIO, DL>>,
    stb: STB,
    digits: [u8; DIGIT_COUNT],
    leds: [u8; DIGIT_COUNT],
}

impl<'a, STB, CLK, DIO, DL> Tm1638<'a, STB, CLK, DIO, DL>
where
    STB: OutputPin + ErrorType<Error = Infallible>,
    CLK: OutputPin + ErrorType<Error = Infallible>,
    DIO: OutputPin + InputPin + ErrorType<Error = Infallible>,
    DL: DelayNs,
{
    /// Attach a panel to the bus, blank it and switch it off
    pub fn new(bus: &'a RefCell<Tm1638Bus<CLK, DIO, DL>>, mut stb: STB) -> Self {
        infallible(stb.set_high());
        let mut panel = Self {
            bus,
            stb,
            digits: [0; DIGIT_COUNT],
            leds: [0; DIGIT_COUNT],
        };
        panel.flush();
        panel.command(display_control(0));
        panel
    }

    /// Send one frame: strobe low, bytes, strobe high
    fn frame(&mut self, bytes: &[u8]) {
        let mut bus = self.bus.borrow_mut();
        infallible(self.stb.set_low());
        for &byte in bytes {
            bus.write_byte(byte);
        }
        infallible(self.stb.set_high());
    }

    fn command(&mut self, byte: u8) {
        self.frame(&[byte]);
    }

    /// Write all 16 display registers from the local copy
    fn flush(&mut self) {
        self.command(cmd::WRITE_AUTO);

        let mut data = [0u8; 1 + 2 * DIGIT_COUNT];
        data[0] = cmd::ADDRESS;
        for (i, (&digit, &led)) in self.digits.iter().zip(&self.leds).enumerate() {
            data[1 + 2 * i] = digit;
            data[2 + 2 * i] = led;
        }
        self.frame(&data);
    }

    /// Write a single register
    fn write_at(&mut self, address: u8, value: u8) {
        self.command(cmd::WRITE_FIXED);
        self.frame(&[cmd::ADDRESS | (address & 0x0F), value]);
    }

    fn scan_keys(&mut self) -> [u8; KEY_BYTES] {
        let mut scan = [0u8; KEY_BYTES];
        let mut bus = self.bus.borrow_mut();
        infallible(self.stb.set_low());
        bus.write_byte(cmd::READ_KEYS);
        bus.release();
        for byte in &mut scan {
            *byte = bus.read_byte();
        }
        infallible(self.stb.set_high());
        scan
    }
}

impl<STB, CLK, DIO, DL> PanelDriver for Tm1638<'_, STB, CLK, DIO, DL>
where
    STB: OutputPin + ErrorType<Error = Infallible>,
    CLK: OutputPin + ErrorType<Error = Infallible>,
    DIO: OutputPin + InputPin + ErrorType<Error = Infallible>,
    DL: DelayNs,
{
    fn render_text(&mut self, glyphs: &[u8; DIGIT_COUNT]) {
        for (segments, &ch) in self.digits.iter_mut().zip(glyphs) {
            *segments = font::glyph(ch);
        }
        self.flush();
    }

    fn clear(&mut self) {
        self.digits = [0; DIGIT_COUNT];
        self.flush();
    }

    fn set_led(&mut self, index: u8, color: Option<Color>) {
        let Some(led) = self.leds.get_mut(index as usize) else {
            return;
        };
        *led = led_value(color);
        let value = *led;
        self.write_at(2 * index + 1, value);
    }

    fn set_leds(&mut self, mask: u8, color: Color) {
        for (i, led) in self.leds.iter_mut().enumerate() {
            *led = if mask & (1 << i) != 0 {
                led_value(Some(color))
            } else {
                0
            };
        }
        self.flush();
    }

    fn set_brightness(&mut self, level: u8) {
        self.command(display_control(level));
    }

    fn read_buttons(&mut self) -> u8 {
        fold_keys(self.scan_keys())
    }
}
