//! Direct query API for in-process collaborators
//!
//! A [`SchedulerHandle`] is a cheap, cloneable, read-only view of the
//! scheduler. Every call reads one published snapshot, so values taken from a
//! single [`SchedulerHandle::weather_state`] are always mutually consistent.

use crate::models::catalog::{Catalog, VariantId};
use crate::models::state::{SchedulerPhase, SchedulerState};
use arc_swap::ArcSwap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    state: Arc<ArcSwap<SchedulerState>>,
    catalog: Arc<Catalog>,
}

impl SchedulerHandle {
    pub(crate) fn new(state: Arc<ArcSwap<SchedulerState>>, catalog: Arc<Catalog>) -> Self {
        Self { state, catalog }
    }

    /// Full snapshot
    pub fn weather_state(&self) -> Arc<SchedulerState> {
        self.state.load_full()
    }

    pub fn current_weather(&self) -> VariantId {
        self.state.load().current_variant.clone()
    }

    /// Magnitude of the current event, `0.0` before the first trigger
    pub fn weather_intensity(&self) -> f64 {
        self.state.load().magnitude
    }

    /// Seconds until the next trigger at the current game speed
    pub fn time_until_next_event(&self, now_tick: u64) -> f64 {
        let state = self.state.load();
        state.seconds_until_next(now_tick, state.ticks_per_second)
    }

    /// Catalog in selection order
    pub fn available_weather_events(&self) -> &[VariantId] {
        self.catalog.variants()
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.state.load().phase()
    }
}
