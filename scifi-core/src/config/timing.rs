//! Animation timing
//!
//! All durations are in caller ticks (millisecond-equivalent). The defaults
//! reproduce the stock panel look: a 200/400 message blink, a 100/200 LED
//! flash and a random LED flip every 300 ticks.

use crate::time::Ticks;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_MESSAGE_BLANK: Ticks = 200;
pub const DEFAULT_MESSAGE_SHOWN: Ticks = 400;
pub const DEFAULT_LEDS_FLASH_OFF: Ticks = 100;
pub const DEFAULT_LEDS_FLASH_ON: Ticks = 200;
pub const DEFAULT_LEDS_BLINK: Ticks = 300;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A phase duration was zero
    ZeroDuration,
}

/// Phase durations for message and LED animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnimationTiming {
    /// Message blanked
    pub message_blank: Ticks,
    /// Message text on display
    pub message_shown: Ticks,
    /// Flashing LEDs all off
    pub leds_flash_off: Ticks,
    /// Flashing LEDs all on
    pub leds_flash_on: Ticks,
    /// Interval between random single-LED flips
    pub leds_blink: Ticks,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            message_blank: DEFAULT_MESSAGE_BLANK,
            message_shown: DEFAULT_MESSAGE_SHOWN,
            leds_flash_off: DEFAULT_LEDS_FLASH_OFF,
            leds_flash_on: DEFAULT_LEDS_FLASH_ON,
            leds_blink: DEFAULT_LEDS_BLINK,
        }
    }
}

impl AnimationTiming {
    /// Check that every phase has a non-zero duration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            self.message_blank,
            self.message_shown,
            self.leds_flash_off,
            self.leds_flash_on,
            self.leds_blink,
        ];
        if durations.contains(&0) {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(())
    }

    /// Length of one full message blink cycle, if it fits in a tick count
    pub fn message_cycle(&self) -> Option<Ticks> {
        self.message_blank.checked_add(self.message_shown)
    }

    /// Length of one full LED flash cycle, if it fits in a tick count
    pub fn leds_flash_cycle(&self) -> Option<Ticks> {
        self.leds_flash_off.checked_add(self.leds_flash_on)
    }
}
