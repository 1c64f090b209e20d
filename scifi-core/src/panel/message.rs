//! Message slots and the blink cycle phases

use crate::config::AnimationTiming;
use crate::time::Ticks;

use super::DIGIT_COUNT;

/// Stored text of one message slot, exactly one glyph per digit
pub type MessageText = [u8; DIGIT_COUNT];

/// Phase of the message blink cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessagePhase {
    /// Not flashing; display left blank
    Off,
    /// Flashing, display currently blank
    Blank,
    /// Flashing, message currently shown
    Shown,
}

impl MessagePhase {
    /// Phase that follows this one in the blink cycle
    pub fn next(self) -> Self {
        match self {
            MessagePhase::Off => MessagePhase::Off,
            MessagePhase::Blank => MessagePhase::Shown,
            MessagePhase::Shown => MessagePhase::Blank,
        }
    }

    /// How long this phase lasts; `None` for `Off`, which never advances
    pub fn duration(self, timing: &AnimationTiming) -> Option<Ticks> {
        match self {
            MessagePhase::Off => None,
            MessagePhase::Blank => Some(timing.message_blank),
            MessagePhase::Shown => Some(timing.message_shown),
        }
    }
}

/// Center up to [`DIGIT_COUNT`] characters of `text` in a message buffer
///
/// Leading padding is `(8 - len) / 2` spaces; the rest of the buffer is
/// spaces too. Characters past the eighth are dropped and non-ASCII
/// characters become `?`.
pub fn center(text: &str) -> MessageText {
    let mut out = [b' '; DIGIT_COUNT];
    let len = text.chars().take(DIGIT_COUNT).count();
    let padding = (DIGIT_COUNT - len) / 2;

    for (glyph, c) in out[padding..].iter_mut().zip(text.chars()) {
        *glyph = if c.is_ascii() { c as u8 } else { b'?' };
    }
    out
}
