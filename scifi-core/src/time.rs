//! Wrapping tick arithmetic
//!
//! The caller's tick counter is a `u32` that wraps around. Timestamps are
//! never compared directly; only the wrapping difference `now - since` is.

/// Monotonic tick count, millisecond-equivalent, wraps at `u32::MAX`
pub type Ticks = u32;

/// Ticks elapsed from `since` to `now`, correct across one wrap
#[inline]
pub fn elapsed(now: Ticks, since: Ticks) -> Ticks {
    now.wrapping_sub(since)
}
