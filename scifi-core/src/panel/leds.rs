//! LED animation modes and their phase table
//!
//! Flashing alternates phase 0 (all off) and phase 1 (all on). Blinking
//! sits in phase 2 forever, flipping one random LED per interval.

use crate::config::AnimationTiming;
use crate::time::Ticks;

/// Flashing, all LEDs off
pub const FLASH_OFF_PHASE: u8 = 0;
/// Flashing, all LEDs on
pub const FLASH_ON_PHASE: u8 = 1;
/// Blinking, single random flip per interval
pub const BLINK_PHASE: u8 = 2;

/// What the LEDs are doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedsMode {
    Disabled,
    Flashing,
    Blinking,
}

/// Duration of an LED phase index
pub fn phase_duration(timing: &AnimationTiming, phase: u8) -> Ticks {
    match phase {
        FLASH_OFF_PHASE => timing.leds_flash_off,
        FLASH_ON_PHASE => timing.leds_flash_on,
        _ => timing.leds_blink,
    }
}

/// LED mask shown during a flash phase
pub fn flash_mask(phase: u8) -> u8 {
    if phase == FLASH_ON_PHASE {
        0xFF
    } else {
        0x00
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_table() {
        let timing = AnimationTiming::default();
        assert_eq!(phase_duration(&timing, FLASH_OFF_PHASE), 100);
        assert_eq!(phase_duration(&timing, FLASH_ON_PHASE), 200);
        assert_eq!(phase_duration(&timing, BLINK_PHASE), 300);
    }

    #[test]
    fn test_flash_mask() {
        assert_eq!(flash_mask(FLASH_OFF_PHASE), 0);
        assert_eq!(flash_mask(FLASH_ON_PHASE), 0xFF);
    }
}
