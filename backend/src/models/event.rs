//! Scheduler event log for replay and auditing
//!
//! Every state change the scheduler makes is recorded here in order, up to a
//! fixed capacity. Two peers fed the same ticks and seed produce identical
//! logs, which makes the log the natural artifact to diff when chasing a
//! desync.
//!
//! # Example
//!
//! ```rust
//! use weather_scheduler_core_rs::models::{EventLog, SchedulerEvent};
//!
//! let mut log = EventLog::new();
//! log.log(SchedulerEvent::Initialized {
//!     tick: 0,
//!     next_trigger_tick: 3600,
//!     ticks_per_second: 30,
//! });
//!
//! assert_eq!(log.len(), 1);
//! assert_eq!(log.events().next().map(|e| e.event_type()), Some("Initialized"));
//! ```

use crate::models::catalog::VariantId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A recorded scheduler state change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulerEvent {
    /// Scheduler created; first trigger sampled
    Initialized {
        tick: u64,
        next_trigger_tick: u64,
        ticks_per_second: u32,
    },

    /// A trigger resampled variant, magnitude and next threshold
    Triggered {
        tick: u64,
        variant: VariantId,
        magnitude: f64,
        next_trigger_tick: u64,
        trigger_count: u64,
    },

    /// Game speed changed; pending threshold left untouched
    TickRateChanged {
        tick: u64,
        old_ticks_per_second: u32,
        new_ticks_per_second: u32,
    },
}

impl SchedulerEvent {
    pub fn tick(&self) -> u64 {
        match self {
            SchedulerEvent::Initialized { tick, .. } => *tick,
            SchedulerEvent::Triggered { tick, .. } => *tick,
            SchedulerEvent::TickRateChanged { tick, .. } => *tick,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            SchedulerEvent::Initialized { .. } => "Initialized",
            SchedulerEvent::Triggered { .. } => "Triggered",
            SchedulerEvent::TickRateChanged { .. } => "TickRateChanged",
        }
    }
}

/// Entries kept by [`EventLog::new`] before the oldest are evicted
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 1024;

/// Ordered, bounded log of the most recent scheduler events
///
/// Once `capacity` entries are held, each new entry evicts the oldest one and
/// bumps [`EventLog::evicted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: VecDeque<SchedulerEvent>,
    capacity: usize,
    evicted: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_LOG_CAPACITY)
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero disables recording
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(DEFAULT_EVENT_LOG_CAPACITY)),
            capacity,
            evicted: 0,
        }
    }

    pub fn log(&mut self, event: SchedulerEvent) {
        if self.capacity == 0 {
            self.evicted += 1;
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.evicted += 1;
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of events dropped to stay within capacity
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Retained events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &SchedulerEvent> + '_ {
        self.events.iter()
    }

    /// Events recorded at a specific tick
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SchedulerEvent> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Only the trigger events, in order
    pub fn triggers(&self) -> impl Iterator<Item = &SchedulerEvent> + '_ {
        self.events
            .iter()
            .filter(|e| matches!(e, SchedulerEvent::Triggered { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triggers_filters_other_events() {
        let mut log = EventLog::new();
        log.log(SchedulerEvent::Initialized {
            tick: 0,
            next_trigger_tick: 1800,
            ticks_per_second: 30,
        });
        log.log(SchedulerEvent::Triggered {
            tick: 1800,
            variant: VariantId::from("fog"),
            magnitude: 0.6,
            next_trigger_tick: 9000,
            trigger_count: 1,
        });
        log.log(SchedulerEvent::TickRateChanged {
            tick: 2000,
            old_ticks_per_second: 30,
            new_ticks_per_second: 60,
        });

        assert_eq!(log.triggers().count(), 1);
        assert_eq!(log.events_at_tick(1800).len(), 1);
        assert_eq!(log.events_at_tick(5).len(), 0);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = SchedulerEvent::Triggered {
            tick: 3600,
            variant: VariantId::from("heavy_rain"),
            magnitude: 0.75,
            next_trigger_tick: 7200,
            trigger_count: 1,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "triggered");
        assert_eq!(json["variant"], "heavy_rain");
    }

    fn tick_event(tick: u64) -> SchedulerEvent {
        SchedulerEvent::TickRateChanged {
            tick,
            old_ticks_per_second: 30,
            new_ticks_per_second: 60,
        }
    }

    #[test]
    fn test_log_evicts_oldest_at_capacity() {
        let mut log = EventLog::with_capacity(3);
        for tick in 0..5 {
            log.log(tick_event(tick));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.evicted(), 2);
        let ticks: Vec<u64> = log.events().map(|e| e.tick()).collect();
        assert_eq!(ticks, vec![2, 3, 4]);
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut log = EventLog::with_capacity(0);
        log.log(tick_event(7));
        assert!(log.is_empty());
        assert_eq!(log.evicted(), 1);
    }
}
