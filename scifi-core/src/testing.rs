//! Test doubles for the driver and random source
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for downstream crates.

use heapless::Vec;
use scifi_protocol::Color;

use crate::panel::DIGIT_COUNT;
use crate::traits::{PanelDriver, RandomSource};

/// Calls kept by a [`MockDriver`] before it stops recording
pub const CALL_LOG_SIZE: usize = 128;

/// One recorded driver call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCall {
    RenderText([u8; DIGIT_COUNT]),
    Clear,
    SetLed(u8, Option<Color>),
    SetLeds(u8, Color),
    SetBrightness(u8),
}

/// Driver that records calls and mirrors what the hardware would show
///
/// Button reads are not recorded.
#[derive(Debug, Default)]
pub struct MockDriver {
    calls: Vec<DriverCall, CALL_LOG_SIZE>,
    display: Option<[u8; DIGIT_COUNT]>,
    leds: [Option<Color>; DIGIT_COUNT],
    brightness: Option<u8>,
    buttons: u8,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw button mask returned by the next reads
    pub fn set_buttons(&mut self, mask: u8) {
        self.buttons = mask;
    }

    /// Text on the digits, or `None` when blank
    pub fn display(&self) -> Option<&str> {
        let text = self.display.as_ref()?;
        core::str::from_utf8(text).ok()
    }

    pub fn leds(&self) -> &[Option<Color>; DIGIT_COUNT] {
        &self.leds
    }

    /// Bit `n` set if LED `n` is lit in any color
    pub fn lit_mask(&self) -> u8 {
        self.leds
            .iter()
            .enumerate()
            .filter(|(_, led)| led.is_some())
            .fold(0, |mask, (i, _)| mask | (1 << i))
    }

    /// Last brightness set, if any
    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }

    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    /// Drain the call log
    pub fn take_calls(&mut self) -> Vec<DriverCall, CALL_LOG_SIZE> {
        core::mem::take(&mut self.calls)
    }

    fn record(&mut self, call: DriverCall) {
        // Full log: drop
        let _ = self.calls.push(call);
    }
}

impl PanelDriver for MockDriver {
    fn render_text(&mut self, text: &[u8; DIGIT_COUNT]) {
        self.record(DriverCall::RenderText(*text));
        self.display = Some(*text);
    }

    fn clear(&mut self) {
        self.record(DriverCall::Clear);
        self.display = None;
    }

    fn set_led(&mut self, index: u8, color: Option<Color>) {
        self.record(DriverCall::SetLed(index, color));
        if let Some(led) = self.leds.get_mut(index as usize) {
            *led = color;
        }
    }

    fn set_leds(&mut self, mask: u8, color: Color) {
        self.record(DriverCall::SetLeds(mask, color));
        for (i, led) in self.leds.iter_mut().enumerate() {
            *led = (mask & (1 << i) != 0).then_some(color);
        }
    }

    fn set_brightness(&mut self, level: u8) {
        self.record(DriverCall::SetBrightness(level));
        self.brightness = Some(level);
    }

    fn read_buttons(&mut self) -> u8 {
        self.buttons
    }
}

/// Predictable random source: yields `start`, `start + step`, ...
#[derive(Debug, Clone)]
pub struct StepRng {
    next: u32,
    step: u32,
}

impl StepRng {
    pub const fn new(start: u32, step: u32) -> Self {
        Self { next: start, step }
    }
}

impl RandomSource for StepRng {
    fn next_u32(&mut self) -> u32 {
        let value = self.next;
        self.next = self.next.wrapping_add(self.step);
        value
    }
}
