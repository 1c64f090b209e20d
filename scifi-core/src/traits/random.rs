//! Pseudo-random source for LED blinking

/// Source of uniformly distributed 32-bit values
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform byte, taken from the high bits
    fn next_u8(&mut self) -> u8 {
        (self.next_u32() >> 24) as u8
    }

    /// Uniform index in `0..8`
    fn next_bit(&mut self) -> u8 {
        (self.next_u32() % 8) as u8
    }
}

/// Marsaglia xorshift32 generator
///
/// Small and deterministic for a given seed. Not suitable for anything but
/// animation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// State used when seeded with zero, which xorshift cannot leave
    const FALLBACK_SEED: u32 = 0x2545_F491;

    pub const fn new(seed: u32) -> Self {
        let state = if seed == 0 { Self::FALLBACK_SEED } else { seed };
        Self { state }
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(Self::FALLBACK_SEED)
    }
}

impl RandomSource for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}
