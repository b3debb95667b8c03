//! Deterministic pseudo-random source shared by the effect generators
//!
//! A prime-modulus linear congruential generator: cheap and reproducible.
//! Statistical quality is not a goal; the same seed always yields the same
//! sequence of drops.

use rand::{RngCore, SeedableRng};

/// Multiplier of the recurrence
pub const MULTIPLIER: u64 = 0x7FFF;
/// Increment of the recurrence
pub const INCREMENT: u64 = 0x7FF;
/// Modulus of the recurrence (2^31 - 1, a Mersenne prime)
pub const MODULUS: u64 = 0x7FFF_FFFF;

/// Seeded generator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaveRng {
    seed: u32,
}

impl WaveRng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Current seed (the last value produced by the recurrence)
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Advance the recurrence and return the low 16 bits of the new seed
    pub fn next16(&mut self) -> u16 {
        let next = (self.seed as u64 * MULTIPLIER + INCREMENT) % MODULUS;
        self.seed = next as u32;
        self.seed as u16
    }

    /// Combine two 16-bit draws (first draw in the high half).
    ///
    /// A nonzero `max` reduces the result into `[0, max)`; `max == 0`
    /// returns the raw 32-bit value.
    pub fn next32(&mut self, max: u32) -> u32 {
        let high = self.next16() as u32;
        let low = self.next16() as u32;
        let value = (high << 16) | low;
        if max != 0 { value % max } else { value }
    }
}

impl RngCore for WaveRng {
    fn next_u32(&mut self) -> u32 {
        self.next32(0)
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for WaveRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
