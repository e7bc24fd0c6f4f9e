//! Deterministic random number generation
//!
//! Every draw the scheduler makes goes through [`RandomSource`]. Peers stay in
//! lockstep only if they share the seed and consume draws in the same order,
//! so the seed, internal state and draw counter together form replicated state
//! ([`RngState`]).

mod xorshift;

pub use xorshift::{RngState, XorShiftRng};

/// A deterministic source of uniform random values
///
/// The scheduler is generic over this seam so hosts can plug in the engine's
/// own synced generator, and tests can script exact draws.
pub trait RandomSource: Send {
    /// Uniform value in `[0.0, 1.0)`
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[min, max)`
    ///
    /// # Panics
    /// Implementations panic if `min >= max`.
    fn range(&mut self, min: i64, max: i64) -> i64;

    /// Uniform real in `[low, high)`; returns `low` when the range is empty
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }

    /// Replicable state, if the source exposes one
    fn state(&self) -> Option<RngState> {
        None
    }
}
