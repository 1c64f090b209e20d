//! Per-panel state machine
//!
//! A [`Panel`] owns one driver plus everything that animates it: eight
//! message slots, the message blink cycle, the LED animation and the button
//! state from the previous tick.
//!
//! ```text
//! message:  Off ──flash──▶ Blank ──200──▶ Shown ──400──▶ Blank ...
//!            ▲                                             │
//!            └──────────────────disable────────────────────┘
//!
//! leds:     Disabled ──flash──▶ phase0 (off) ◀─100/200─▶ phase1 (on)
//!           Disabled ──blink──▶ phase2 (flip one random LED every 300)
//! ```
//!
//! Phase timestamps advance by the duration that just elapsed rather than
//! snapping to `now`, so a late tick never shifts the animation.

pub mod leds;
pub mod message;

use scifi_protocol::Color;

use crate::config::AnimationTiming;
use crate::time::{self, Ticks};
use crate::traits::{PanelDriver, RandomSource};

pub use leds::LedsMode;
pub use message::{MessagePhase, MessageText};

/// Digits, LEDs and buttons per panel
pub const DIGIT_COUNT: usize = 8;

/// Stored messages per panel, one per button
pub const MESSAGE_SLOTS: usize = 8;

#[derive(Debug, Clone, Copy)]
struct MessageCycle {
    phase: MessagePhase,
    /// Valid whenever `phase != Off`
    slot: u8,
    since: Ticks,
}

#[derive(Debug, Clone, Copy)]
struct LedCycle {
    mode: LedsMode,
    color: Color,
    value: u8,
    phase: u8,
    since: Ticks,
}

/// One physical display panel and its animation state
pub struct Panel<D> {
    driver: D,
    timing: AnimationTiming,
    messages: [MessageText; MESSAGE_SLOTS],
    message: MessageCycle,
    leds: LedCycle,
    last_buttons: u8,
}

impl<D: PanelDriver> Panel<D> {
    /// Create a panel with blank messages, nothing animating
    pub fn new(driver: D, timing: AnimationTiming) -> Self {
        Self {
            driver,
            timing,
            messages: [[b' '; DIGIT_COUNT]; MESSAGE_SLOTS],
            message: MessageCycle {
                phase: MessagePhase::Off,
                slot: 0,
                since: 0,
            },
            leds: LedCycle {
                mode: LedsMode::Disabled,
                color: Color::Red,
                value: 0,
                phase: 0,
                since: 0,
            },
            last_buttons: 0,
        }
    }

    /// Set brightness, 0 (off) to 8 (max)
    ///
    /// The range is the caller's responsibility.
    pub fn set_brightness(&mut self, level: u8) {
        self.driver.set_brightness(level);
    }

    /// Store centered text in a message slot (0-7)
    ///
    /// Invalid slots are ignored. If the slot is flashing, the new text shows
    /// up the next time the message is drawn.
    pub fn set_message(&mut self, slot: u8, text: &str) {
        if let Some(buffer) = self.messages.get_mut(slot as usize) {
            *buffer = message::center(text);
        }
    }

    /// Stored text of a message slot, or `None` for an invalid slot
    pub fn message(&self, slot: u8) -> Option<&str> {
        let buffer = self.messages.get(slot as usize)?;
        core::str::from_utf8(buffer).ok()
    }

    /// Start flashing the message in `slot` (0-7), beginning blank
    ///
    /// Restarts the cycle if a message is already flashing. Invalid slots
    /// are ignored.
    pub fn flash_message(&mut self, slot: u8, now: Ticks) {
        if slot as usize >= MESSAGE_SLOTS {
            return;
        }
        self.message = MessageCycle {
            phase: MessagePhase::Blank,
            slot,
            since: now,
        };
        self.driver.clear();
    }

    /// Stop flashing and blank the display
    pub fn disable_message(&mut self) {
        self.message.phase = MessagePhase::Off;
        self.driver.clear();
    }

    /// Slot currently flashing, or `None` when the message is off
    pub fn message_index(&self) -> Option<u8> {
        match self.message.phase {
            MessagePhase::Off => None,
            _ => Some(self.message.slot),
        }
    }

    pub fn message_phase(&self) -> MessagePhase {
        self.message.phase
    }

    /// Blink the LEDs: start from a random pattern, then flip one random LED
    /// per interval
    pub fn blink_leds<R: RandomSource>(&mut self, color: Color, now: Ticks, rng: &mut R) {
        let value = rng.next_u8();
        self.leds = LedCycle {
            mode: LedsMode::Blinking,
            color,
            value,
            phase: leds::BLINK_PHASE,
            since: now,
        };
        self.driver.set_leds(value, color);
    }

    /// Flash all LEDs together, starting with them off
    pub fn flash_leds(&mut self, color: Color, now: Ticks) {
        self.leds = LedCycle {
            mode: LedsMode::Flashing,
            color,
            value: 0,
            phase: leds::FLASH_OFF_PHASE,
            since: now,
        };
        self.driver.set_leds(0, color);
    }

    /// Stop LED animation and turn all LEDs off
    pub fn disable_leds(&mut self) {
        self.leds.mode = LedsMode::Disabled;
        self.leds.value = 0;
        self.driver.set_leds(0, self.leds.color);
    }

    pub fn leds_mode(&self) -> LedsMode {
        self.leds.mode
    }

    pub fn leds_color(&self) -> Color {
        self.leds.color
    }

    /// Which LEDs are currently lit
    pub fn leds_value(&self) -> u8 {
        self.leds.value
    }

    /// Advance animations to `now` and return newly pressed buttons
    ///
    /// Bit `n` of the result is set if button `n` is down now and was up on
    /// the previous tick.
    pub fn tick<R: RandomSource>(&mut self, now: Ticks, rng: &mut R) -> u8 {
        self.advance_message(now);
        self.advance_leds(now, rng);
        self.poll_buttons()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn advance_message(&mut self, now: Ticks) {
        let timing = self.timing;
        let cycle = &mut self.message;
        if cycle.phase == MessagePhase::Off {
            return;
        }

        let mut elapsed = time::elapsed(now, cycle.since);
        let mut changed = false;

        // Whole blank+shown cycles land on the same phase
        if let Some(period) = timing.message_cycle() {
            if elapsed >= period {
                let skipped = elapsed - elapsed % period;
                cycle.since = cycle.since.wrapping_add(skipped);
                elapsed -= skipped;
                changed = true;
            }
        }

        while let Some(duration) = cycle.phase.duration(&timing) {
            if elapsed < duration {
                break;
            }
            cycle.since = cycle.since.wrapping_add(duration);
            elapsed -= duration;
            cycle.phase = cycle.phase.next();
            changed = true;
        }

        if changed {
            self.draw_message();
        }
    }

    fn draw_message(&mut self) {
        match self.message.phase {
            MessagePhase::Shown => {
                let text = self.messages[self.message.slot as usize];
                self.driver.render_text(&text);
            }
            MessagePhase::Blank | MessagePhase::Off => self.driver.clear(),
        }
    }

    fn advance_leds<R: RandomSource>(&mut self, now: Ticks, rng: &mut R) {
        let timing = self.timing;
        let cycle = &mut self.leds;
        let mut elapsed = time::elapsed(now, cycle.since);

        match cycle.mode {
            LedsMode::Disabled => {}
            LedsMode::Flashing => {
                let mut changed = false;

                if let Some(period) = timing.leds_flash_cycle() {
                    if elapsed >= period {
                        let skipped = elapsed - elapsed % period;
                        cycle.since = cycle.since.wrapping_add(skipped);
                        elapsed -= skipped;
                        changed = true;
                    }
                }

                loop {
                    let duration = leds::phase_duration(&timing, cycle.phase);
                    if elapsed < duration {
                        break;
                    }
                    cycle.since = cycle.since.wrapping_add(duration);
                    elapsed -= duration;
                    cycle.phase ^= 1;
                    changed = true;
                }

                if changed {
                    cycle.value = leds::flash_mask(cycle.phase);
                    self.driver.set_leds(cycle.value, cycle.color);
                }
            }
            LedsMode::Blinking => {
                let duration = leds::phase_duration(&timing, cycle.phase);
                while elapsed >= duration {
                    cycle.since = cycle.since.wrapping_add(duration);
                    elapsed -= duration;

                    let bit = rng.next_bit();
                    cycle.value ^= 1 << bit;
                    let lit = cycle.value & (1 << bit) != 0;
                    self.driver.set_led(bit, lit.then_some(cycle.color));
                }
            }
        }
    }

    fn poll_buttons(&mut self) -> u8 {
        let raw = self.driver.read_buttons();
        let rising = raw & !self.last_buttons;
        self.last_buttons = raw;
        rising
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DriverCall, MockDriver, StepRng};
    use proptest::prelude::*;

    fn panel() -> Panel<MockDriver> {
        Panel::new(MockDriver::new(), AnimationTiming::default())
    }

    #[test]
    fn test_set_message_pads() {
        let mut panel = panel();
        panel.set_message(2, "HELLO");
        assert_eq!(panel.message(2), Some(" HELLO  "));
        assert_eq!(panel.message(0), Some("        "));
    }

    #[test]
    fn test_invalid_slot_is_noop() {
        let mut panel = panel();
        panel.set_message(1, "KEEP");
        panel.flash_message(1, 0);
        panel.driver_mut().take_calls();

        panel.set_message(8, "NOPE");
        panel.flash_message(8, 50);
        panel.flash_message(200, 50);

        assert_eq!(panel.message(8), None);
        assert_eq!(panel.message_index(), Some(1));
        assert_eq!(panel.message_phase(), MessagePhase::Blank);
        assert!(panel.driver().calls().is_empty());
    }

    #[test]
    fn test_flash_cycle() {
        let mut panel = panel();
        let mut rng = StepRng::new(0, 1);
        panel.set_message(0, "ABC");
        panel.flash_message(0, 1000);
        assert_eq!(panel.driver().display(), None);
        assert_eq!(panel.message_index(), Some(0));

        panel.tick(1199, &mut rng);
        assert_eq!(panel.message_phase(), MessagePhase::Blank);

        panel.tick(1200, &mut rng);
        assert_eq!(panel.message_phase(), MessagePhase::Shown);
        assert_eq!(panel.driver().display(), Some("  ABC   "));

        panel.tick(1599, &mut rng);
        assert_eq!(panel.message_phase(), MessagePhase::Shown);

        panel.tick(1600, &mut rng);
        assert_eq!(panel.message_phase(), MessagePhase::Blank);
        assert_eq!(panel.driver().display(), None);
    }

    #[test]
    fn test_late_tick_does_not_drift() {
        let mut panel = panel();
        let mut rng = StepRng::new(0, 1);
        panel.flash_message(0, 0);

        // 250 ticks late into Shown; the next blank is still due at 600
        panel.tick(450, &mut rng);
        assert_eq!(panel.message_phase(), MessagePhase::Shown);
        panel.tick(599, &mut rng);
        assert_eq!(panel.message_phase(), MessagePhase::Shown);
        panel.tick(600, &mut rng);
        assert_eq!(panel.message_phase(), MessagePhase::Blank);
    }

    #[test]
    fn test_flash_restarts_and_switches_slot() {
        let mut panel = panel();
        let mut rng = StepRng::new(0, 1);
        panel.set_message(0, "ONE");
        panel.set_message(1, "TWO");
        panel.flash_message(0, 0);
        panel.tick(200, &mut rng);
        assert_eq!(panel.driver().display(), Some("  ONE   "));

        panel.flash_message(1, 300);
        assert_eq!(panel.message_phase(), MessagePhase::Blank);
        assert_eq!(panel.driver().display(), None);
        panel.tick(500, &mut rng);
        assert_eq!(panel.driver().display(), Some("  TWO   "));
    }

    #[test]
    fn test_overwrite_active_slot_on_next_draw() {
        let mut panel = panel();
        let mut rng = StepRng::new(0, 1);
        panel.set_message(0, "OLD");
        panel.flash_message(0, 0);
        panel.tick(200, &mut rng);
        panel.set_message(0, "NEW");
        assert_eq!(panel.driver().display(), Some("  OLD   "));

        panel.tick(800, &mut rng);
        assert_eq!(panel.driver().display(), Some("  NEW   "));
    }

    #[test]
    fn test_disable_message() {
        let mut panel = panel();
        let mut rng = StepRng::new(0, 1);
        panel.flash_message(3, 0);
        panel.tick(200, &mut rng);
        panel.disable_message();
        assert_eq!(panel.message_index(), None);
        assert_eq!(panel.driver().display(), None);

        panel.driver_mut().take_calls();
        panel.tick(10_000, &mut rng);
        assert!(panel.driver().calls().is_empty());
    }

    #[test]
    fn test_message_across_tick_wrap() {
        let mut panel = panel();
        let mut rng = StepRng::new(0, 1);
        let start = u32::MAX - 99;
        panel.flash_message(0, start);

        panel.tick(99, &mut rng);
        assert_eq!(panel.message_phase(), MessagePhase::Blank);
        panel.tick(100, &mut rng);
        assert_eq!(panel.message_phase(), MessagePhase::Shown);
        panel.tick(500, &mut rng);
        assert_eq!(panel.message_phase(), MessagePhase::Blank);
    }

    #[test]
    fn test_flash_leds() {
        let mut panel = panel();
        let mut rng = StepRng::new(0, 1);
        panel.flash_leds(Color::Green, 0);
        assert_eq!(panel.leds_mode(), LedsMode::Flashing);
        assert_eq!(panel.driver().lit_mask(), 0);

        panel.tick(100, &mut rng);
        assert_eq!(panel.leds_value(), 0xFF);
        assert_eq!(panel.driver().lit_mask(), 0xFF);
        assert_eq!(panel.driver().leds()[0], Some(Color::Green));

        panel.tick(299, &mut rng);
        assert_eq!(panel.leds_value(), 0xFF);

        panel.tick(300, &mut rng);
        assert_eq!(panel.leds_value(), 0);
        assert_eq!(panel.driver().lit_mask(), 0);
    }

    #[test]
    fn test_blink_leds_flips_one_bit_per_interval() {
        let mut panel = panel();
        // Initial pattern 0x00, then bits 1, 2, 3...
        let mut rng = StepRng::new(0, 1);
        panel.blink_leds(Color::Red, 0, &mut rng);
        assert_eq!(panel.leds_mode(), LedsMode::Blinking);
        assert_eq!(panel.leds_value(), 0);
        panel.driver_mut().take_calls();

        panel.tick(299, &mut rng);
        assert_eq!(panel.leds_value(), 0);

        panel.tick(300, &mut rng);
        assert_eq!(panel.leds_value(), 0b0000_0010);
        assert_eq!(
            panel.driver().calls(),
            &[DriverCall::SetLed(1, Some(Color::Red))]
        );

        // Two intervals elapsed at once flip two bits
        panel.tick(900, &mut rng);
        assert_eq!(panel.leds_value(), 0b0000_1110);
    }

    #[test]
    fn test_blink_initial_pattern_rendered() {
        let mut panel = panel();
        let mut rng = StepRng::new(0xA5 << 24, 0);
        panel.blink_leds(Color::Green, 0, &mut rng);
        assert_eq!(panel.leds_value(), 0xA5);
        assert_eq!(panel.driver().lit_mask(), 0xA5);
    }

    #[test]
    fn test_disable_leds() {
        let mut panel = panel();
        let mut rng = StepRng::new(u32::MAX, 0);
        panel.blink_leds(Color::Green, 0, &mut rng);
        assert_eq!(panel.driver().lit_mask(), 0xFF);

        panel.disable_leds();
        assert_eq!(panel.leds_mode(), LedsMode::Disabled);
        assert_eq!(panel.driver().lit_mask(), 0);

        panel.driver_mut().take_calls();
        panel.tick(5000, &mut rng);
        assert!(panel.driver().calls().is_empty());
    }

    #[test]
    fn test_button_edges() {
        let mut panel = panel();
        let mut rng = StepRng::new(0, 1);

        panel.driver_mut().set_buttons(0b0000_0100);
        assert_eq!(panel.tick(0, &mut rng), 0b0000_0100);

        // Held: reported once
        assert_eq!(panel.tick(10, &mut rng), 0);

        panel.driver_mut().set_buttons(0b0000_0101);
        assert_eq!(panel.tick(20, &mut rng), 0b0000_0001);

        panel.driver_mut().set_buttons(0);
        assert_eq!(panel.tick(30, &mut rng), 0);

        panel.driver_mut().set_buttons(0b0000_0100);
        assert_eq!(panel.tick(40, &mut rng), 0b0000_0100);
    }

    #[test]
    fn test_brightness_forwarded() {
        let mut panel = panel();
        panel.set_brightness(0);
        assert_eq!(panel.driver().brightness(), Some(0));
        panel.set_brightness(8);
        assert_eq!(panel.driver().brightness(), Some(8));
    }

    proptest! {
        #[test]
        fn prop_rising_edges(reads in proptest::collection::vec(any::<u8>(), 1..32)) {
            let mut panel = panel();
            let mut rng = StepRng::new(0, 1);
            let mut previous = 0u8;
            for (i, &raw) in reads.iter().enumerate() {
                panel.driver_mut().set_buttons(raw);
                let rising = panel.tick(i as u32, &mut rng);
                prop_assert_eq!(rising, raw & !previous);
                previous = raw;
            }
        }

        #[test]
        fn prop_catch_up_matches_every_tick(
            start in any::<u32>(),
            gaps in proptest::collection::vec(1u32..2000, 1..20),
        ) {
            let mut sparse = panel();
            let mut dense = panel();
            let mut rng_sparse = StepRng::new(0, 1);
            let mut rng_dense = StepRng::new(0, 1);
            for p in [&mut sparse, &mut dense] {
                p.set_message(4, "SCIFI");
                p.flash_message(4, start);
                p.flash_leds(Color::Red, start);
            }

            let mut now = start;
            for gap in gaps {
                for _ in 0..gap {
                    now = now.wrapping_add(1);
                    dense.tick(now, &mut rng_dense);
                }
                sparse.tick(now, &mut rng_sparse);
                prop_assert_eq!(sparse.message_phase(), dense.message_phase());
                prop_assert_eq!(sparse.driver().display(), dense.driver().display());
                prop_assert_eq!(sparse.leds_value(), dense.leds_value());
                prop_assert_eq!(sparse.driver().lit_mask(), dense.driver().lit_mask());
            }
        }

        #[test]
        fn prop_blink_catch_up_matches_every_tick(
            seed in any::<u32>(),
            gaps in proptest::collection::vec(1u32..1500, 1..10),
        ) {
            let mut sparse = panel();
            let mut dense = panel();
            let mut rng_sparse = crate::traits::XorShift32::new(seed);
            let mut rng_dense = crate::traits::XorShift32::new(seed);
            sparse.blink_leds(Color::Green, 0, &mut rng_sparse);
            dense.blink_leds(Color::Green, 0, &mut rng_dense);

            let mut now = 0u32;
            for gap in gaps {
                for _ in 0..gap {
                    now += 1;
                    dense.tick(now, &mut rng_dense);
                }
                sparse.tick(now, &mut rng_sparse);
                prop_assert_eq!(sparse.leds_value(), dense.leds_value());
                prop_assert_eq!(sparse.driver().lit_mask(), dense.driver().lit_mask());
            }
        }
    }
}
