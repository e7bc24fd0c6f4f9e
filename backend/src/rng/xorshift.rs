//! xorshift64* generator
//!
//! Fast, 64-bit state, passes BigCrush. Same seed gives the same sequence on
//! every platform, which is all the scheduler needs for cross-peer agreement.

use super::RandomSource;
use serde::{Deserialize, Serialize};

const MULTIPLIER: u64 = 0x2545_F491_4F6C_DD1D;

/// Replicable generator state: seed, current word and number of draws taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub state: u64,
    pub draws: u64,
}

/// Seeded xorshift64* generator with a draw counter
///
/// # Example
/// ```
/// use weather_scheduler_core_rs::rng::{RandomSource, XorShiftRng};
///
/// let mut a = XorShiftRng::new(12345);
/// let mut b = XorShiftRng::new(12345);
/// assert_eq!(a.next_f64(), b.next_f64());
/// assert_eq!(a.draws(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XorShiftRng {
    seed: u64,
    state: u64,
    draws: u64,
}

impl XorShiftRng {
    pub fn new(seed: u64) -> Self {
        // xorshift is stuck at zero forever
        let state = if seed == 0 { 1 } else { seed };
        Self {
            seed,
            state,
            draws: 0,
        }
    }

    /// Rebuild a generator positioned exactly where `state` was captured
    pub fn from_state(state: RngState) -> Self {
        Self {
            seed: state.seed,
            state: if state.state == 0 { 1 } else { state.state },
            draws: state.draws,
        }
    }

    /// Next raw 64-bit output
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        self.draws += 1;
        x.wrapping_mul(MULTIPLIER)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of raw draws consumed since seeding
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn snapshot(&self) -> RngState {
        RngState {
            seed: self.seed,
            state: self.state,
            draws: self.draws,
        }
    }
}

impl RandomSource for XorShiftRng {
    fn next_f64(&mut self) -> f64 {
        // Top 53 bits → [0, 1)
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");
        let span = max.wrapping_sub(min) as u64;
        min.wrapping_add((self.next_u64() % span) as i64)
    }

    fn state(&self) -> Option<RngState> {
        Some(self.snapshot())
    }
}
