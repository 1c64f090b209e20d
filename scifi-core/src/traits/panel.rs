//! Driver adapter trait for one TM1638-style panel

use scifi_protocol::Color;

use crate::panel::DIGIT_COUNT;

/// Trait for one physical panel: 8 digits, 8 bicolor LEDs, 8 buttons
///
/// Calls are synchronous and infallible from the core's point of view.
/// Bus errors are the implementation's business.
pub trait PanelDriver {
    /// Show 8 ASCII glyphs, leftmost digit first
    fn render_text(&mut self, glyphs: &[u8; DIGIT_COUNT]);

    /// Blank every digit
    fn clear(&mut self);

    /// Set one LED (0-7) to a color, or off with `None`
    fn set_led(&mut self, index: u8, color: Option<Color>);

    /// Set all 8 LEDs at once: set bits lit in `color`, clear bits off
    fn set_leds(&mut self, mask: u8, color: Color);

    /// Brightness 0 (lights off) to 8 (maximum)
    fn set_brightness(&mut self, level: u8);

    /// Raw button state, bit 0 is the leftmost button
    fn read_buttons(&mut self) -> u8;
}
