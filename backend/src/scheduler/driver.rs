//! Host-side tick loop
//!
//! The scheduler never wakes itself up. `TickDriver` plays the host runtime:
//! it owns the clock, advances it one tick at a time and calls
//! [`WeatherScheduler::on_tick`] every `update_interval` ticks.
//!
//! ```text
//! For each tick t:
//! 1. Advance clock
//! 2. If t % update_interval == 0: scheduler.on_tick(t)
//! ```

use crate::core::time::{seconds_to_ticks, TickClock};
use crate::scheduler::engine::{SchedulerError, TriggerRecord, WeatherScheduler};

#[derive(Debug)]
pub struct TickDriver {
    clock: TickClock,
    scheduler: WeatherScheduler,
    update_interval: u64,
}

impl TickDriver {
    /// Drive `scheduler` from `clock`. The clock's rate should match the
    /// scheduler's game speed.
    pub fn new(scheduler: WeatherScheduler, clock: TickClock) -> Self {
        let update_interval = scheduler.config().update_interval;
        Self {
            clock,
            scheduler,
            update_interval,
        }
    }

    /// Clock at tick 0 with the scheduler's configured rate
    pub fn starting_at_zero(scheduler: WeatherScheduler) -> Self {
        let clock = TickClock::new(scheduler.ticks_per_second());
        Self::new(scheduler, clock)
    }

    /// Advance one tick, checking the scheduler on cadence boundaries
    pub fn step(&mut self) -> Option<TriggerRecord> {
        self.clock.advance_tick();
        if self.clock.is_check_tick(self.update_interval) {
            self.scheduler.on_tick(self.clock.current_tick())
        } else {
            None
        }
    }

    /// Run `ticks` ticks and collect every trigger that fired
    pub fn run_ticks(&mut self, ticks: u64) -> Vec<TriggerRecord> {
        (0..ticks).filter_map(|_| self.step()).collect()
    }

    /// Run for `seconds` of simulated time at the current game speed
    pub fn run_seconds(&mut self, seconds: f64) -> Vec<TriggerRecord> {
        let ticks = seconds_to_ticks(seconds, self.clock.ticks_per_second());
        self.run_ticks(ticks)
    }

    /// Change the game speed on both the clock and the scheduler
    pub fn set_ticks_per_second(&mut self, ticks_per_second: u32) -> Result<(), SchedulerError> {
        self.scheduler
            .set_ticks_per_second(self.clock.current_tick(), ticks_per_second)?;
        self.clock.set_ticks_per_second(ticks_per_second);
        Ok(())
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn scheduler(&self) -> &WeatherScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut WeatherScheduler {
        &mut self.scheduler
    }

    pub fn into_scheduler(self) -> WeatherScheduler {
        self.scheduler
    }
}
