//! Time management for the scheduler
//!
//! The host runtime advances time in discrete ticks at a fixed ticks-per-second
//! rate. All scheduling arithmetic is done in integer ticks so that every peer
//! reaches identical thresholds regardless of local wall-clock drift. Seconds
//! only appear in configuration and in human-facing projections.

use serde::{Deserialize, Serialize};

/// Default host tick rate
pub const DEFAULT_TICKS_PER_SECOND: u32 = 30;

/// Convert a duration in seconds to a whole number of ticks.
///
/// Rounds to the nearest tick. Negative and non-finite durations map to 0;
/// callers validate configuration before converting.
///
/// # Example
/// ```
/// use weather_scheduler_core_rs::core::time::seconds_to_ticks;
///
/// assert_eq!(seconds_to_ticks(120.0, 30), 3600);
/// assert_eq!(seconds_to_ticks(0.5, 30), 15);
/// ```
pub fn seconds_to_ticks(seconds: f64, ticks_per_second: u32) -> u64 {
    let ticks = seconds * f64::from(ticks_per_second);
    if !ticks.is_finite() || ticks <= 0.0 {
        return 0;
    }
    ticks.round() as u64
}

/// Convert a tick count to seconds at the given rate.
///
/// # Example
/// ```
/// use weather_scheduler_core_rs::core::time::ticks_to_seconds;
///
/// assert_eq!(ticks_to_seconds(3600, 30), 120.0);
/// ```
pub fn ticks_to_seconds(ticks: u64, ticks_per_second: u32) -> f64 {
    assert!(ticks_per_second > 0, "ticks_per_second must be positive");
    ticks as f64 / f64::from(ticks_per_second)
}

/// Monotonic tick counter with a ticks-per-second rate
///
/// Stands in for the host runtime's frame counter.
///
/// # Example
/// ```
/// use weather_scheduler_core_rs::TickClock;
///
/// let mut clock = TickClock::new(30);
/// assert_eq!(clock.current_tick(), 0);
///
/// clock.advance_by(90);
/// assert_eq!(clock.current_tick(), 90);
/// assert_eq!(clock.elapsed_seconds(), 3.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickClock {
    /// Total ticks elapsed since start
    current_tick: u64,
    /// Simulation rate (game speed)
    ticks_per_second: u32,
}

impl TickClock {
    /// Create a clock at tick 0
    ///
    /// # Panics
    /// Panics if `ticks_per_second` is zero.
    pub fn new(ticks_per_second: u32) -> Self {
        Self::starting_at(0, ticks_per_second)
    }

    /// Create a clock that starts at an arbitrary tick (late joiners)
    pub fn starting_at(current_tick: u64, ticks_per_second: u32) -> Self {
        assert!(ticks_per_second > 0, "ticks_per_second must be positive");
        Self {
            current_tick,
            ticks_per_second,
        }
    }

    /// Advance time by one tick
    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
    }

    /// Advance time by `ticks` ticks
    pub fn advance_by(&mut self, ticks: u64) {
        self.current_tick += ticks;
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    /// Change the game speed. Ticks already elapsed are unaffected.
    ///
    /// # Panics
    /// Panics if `ticks_per_second` is zero.
    pub fn set_ticks_per_second(&mut self, ticks_per_second: u32) {
        assert!(ticks_per_second > 0, "ticks_per_second must be positive");
        self.ticks_per_second = ticks_per_second;
    }

    /// Seconds elapsed at the current rate
    pub fn elapsed_seconds(&self) -> f64 {
        ticks_to_seconds(self.current_tick, self.ticks_per_second)
    }

    /// Whether the current tick lands on a check boundary of `interval` ticks
    ///
    /// # Example
    /// ```
    /// use weather_scheduler_core_rs::TickClock;
    ///
    /// let mut clock = TickClock::new(30);
    /// assert!(clock.is_check_tick(10));
    /// clock.advance_tick();
    /// assert!(!clock.is_check_tick(10));
    /// ```
    pub fn is_check_tick(&self, interval: u64) -> bool {
        interval > 0 && self.current_tick % interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "ticks_per_second must be positive")]
    fn test_zero_ticks_per_second_panics() {
        TickClock::new(0);
    }

    #[test]
    fn test_seconds_to_ticks_rounds_to_nearest() {
        assert_eq!(seconds_to_ticks(119.999_999_9, 30), 3600);
        assert_eq!(seconds_to_ticks(0.04, 30), 1);
        assert_eq!(seconds_to_ticks(1.0 / 90.0, 30), 0);
    }

    #[test]
    fn test_seconds_to_ticks_rejects_degenerate_input() {
        assert_eq!(seconds_to_ticks(-5.0, 30), 0);
        assert_eq!(seconds_to_ticks(f64::NAN, 30), 0);
        assert_eq!(seconds_to_ticks(f64::INFINITY, 30), 0);
    }

    #[test]
    fn test_zero_interval_never_checks() {
        let clock = TickClock::new(30);
        assert!(!clock.is_check_tick(0));
    }
}
