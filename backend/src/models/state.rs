//! Scheduler state snapshot
//!
//! `SchedulerState` is immutable once published. The scheduler builds a fresh
//! value at every trigger and swaps it in whole, so a reader holding one can
//! never see a new variant paired with an old magnitude.

use crate::core::time::ticks_to_seconds;
use crate::models::catalog::VariantId;
use serde::{Deserialize, Serialize};

/// Lifecycle phase. `Idle -> Active` happens once, on the first trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerPhase {
    Idle,
    Active,
}

/// Full scheduler state at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerState {
    /// Current variant; the catalog's neutral variant until the first trigger
    pub current_variant: VariantId,

    /// Severity in `[0.5, 1.0]`, or `0.0` before the first trigger
    pub magnitude: f64,

    /// Tick of the most recent trigger (0 before the first)
    pub last_trigger_tick: u64,

    /// Tick at or after which the next trigger is due
    pub next_trigger_tick: u64,

    /// True once at least one trigger has happened
    pub active: bool,

    /// Number of completed triggers
    pub trigger_count: u64,

    /// Game speed used for the most recent seconds/ticks conversion
    pub ticks_per_second: u32,
}

impl SchedulerState {
    /// Idle state waiting for its first trigger at `next_trigger_tick`
    pub fn idle(neutral: VariantId, next_trigger_tick: u64, ticks_per_second: u32) -> Self {
        Self {
            current_variant: neutral,
            magnitude: 0.0,
            last_trigger_tick: 0,
            next_trigger_tick,
            active: false,
            trigger_count: 0,
            ticks_per_second,
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        if self.active {
            SchedulerPhase::Active
        } else {
            SchedulerPhase::Idle
        }
    }

    /// Whether a check at `now_tick` must trigger
    pub fn is_due(&self, now_tick: u64) -> bool {
        now_tick >= self.next_trigger_tick
    }

    /// Ticks remaining until the next trigger, saturating at zero
    pub fn ticks_until_next(&self, now_tick: u64) -> u64 {
        self.next_trigger_tick.saturating_sub(now_tick)
    }

    /// Seconds remaining until the next trigger at the given game speed
    ///
    /// # Example
    /// ```
    /// use weather_scheduler_core_rs::{SchedulerState, VariantId};
    ///
    /// let state = SchedulerState::idle(VariantId::from("clear_skies"), 3600, 30);
    /// assert_eq!(state.seconds_until_next(1800, 30), 60.0);
    /// assert_eq!(state.seconds_until_next(9000, 30), 0.0);
    /// ```
    pub fn seconds_until_next(&self, now_tick: u64, ticks_per_second: u32) -> f64 {
        ticks_to_seconds(self.ticks_until_next(now_tick), ticks_per_second)
    }
}
