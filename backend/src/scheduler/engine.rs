//! Weather Scheduler Engine
//!
//! Decides when the next global weather event fires, which variant it is and
//! how strong it is, then publishes that decision for everyone else.
//!
//! # Determinism
//!
//! All timing is integer ticks and all randomness comes from one
//! [`RandomSource`] consumed in a fixed order:
//!
//! ```text
//! build(now):   gap ~ U[initial_delay, max_interval]
//! each trigger: variant ~ U{catalog}, magnitude = 0.5 + U[0,1) * 0.5,
//!               gap ~ U[min_interval, max_interval]
//! ```
//!
//! Peers that share the seed, the catalog order and the tick sequence
//! therefore reach the same timeline without exchanging a single message.
//!
//! # Example
//!
//! ```rust
//! use weather_scheduler_core_rs::{SchedulerConfig, WeatherScheduler};
//!
//! let mut scheduler = WeatherScheduler::new(SchedulerConfig::with_seed(42), 0).unwrap();
//! assert_eq!(scheduler.current_variant(), "clear_skies");
//!
//! let due = scheduler.state().next_trigger_tick;
//! let record = scheduler.on_tick(due).unwrap();
//! assert!(record.magnitude >= 0.5 && record.magnitude <= 1.0);
//! assert!(scheduler.on_tick(due).is_none());
//! ```

use crate::broadcast::{BroadcastPublisher, BroadcastReader};
use crate::core::time::{seconds_to_ticks, ticks_to_seconds};
use crate::effects::{EffectConsumer, EffectRegistry};
use crate::models::catalog::{Catalog, CatalogError, VariantId};
use crate::models::event::{EventLog, SchedulerEvent, DEFAULT_EVENT_LOG_CAPACITY};
use crate::models::state::{SchedulerPhase, SchedulerState};
use crate::rng::{RandomSource, RngState, XorShiftRng};
use crate::scheduler::config::SchedulerConfig;
use crate::scheduler::handle::SchedulerHandle;
use crate::scheduler::sync::{compute_config_hash, compute_state_digest, SyncSnapshot};
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Lowest magnitude a trigger can produce
pub const MIN_MAGNITUDE: f64 = 0.5;
/// Highest magnitude a trigger can produce
pub const MAX_MAGNITUDE: f64 = 1.0;

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced before the scheduler starts
///
/// Once a scheduler exists, nothing it does can fail.
#[derive(Debug, Error, PartialEq)]
pub enum SchedulerError {
    #[error("min_interval_secs ({min}) exceeds max_interval_secs ({max})")]
    InvalidInterval { min: f64, max: f64 },

    #[error("{field} must not be negative (got {value})")]
    NegativeDuration { field: &'static str, value: f64 },

    #[error("{field} exceeds {max} seconds (got {value})")]
    DurationTooLarge {
        field: &'static str,
        value: f64,
        max: f64,
    },

    #[error("{field} must be finite (got {value})")]
    NonFiniteDuration { field: &'static str, value: f64 },

    #[error("initial_delay_secs ({initial_delay}) exceeds max_interval_secs ({max})")]
    InitialDelayExceedsMax { initial_delay: f64, max: f64 },

    #[error("ticks_per_second must be positive")]
    InvalidTickRate,

    #[error("update_interval must be positive")]
    InvalidUpdateInterval,

    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

// ============================================================================
// Trigger Result
// ============================================================================

/// Outcome of a trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRecord {
    /// Tick the trigger fired on
    pub tick: u64,
    pub variant: VariantId,
    pub magnitude: f64,
    pub next_trigger_tick: u64,
    /// Freshly sampled gap to the next trigger
    pub gap_ticks: u64,
    /// 1-based count of triggers so far
    pub trigger_count: u64,
    /// Broadcast sequence number of this publication
    pub sequence: u64,
}

impl TriggerRecord {
    pub fn gap_seconds(&self, ticks_per_second: u32) -> f64 {
        ticks_to_seconds(self.gap_ticks, ticks_per_second)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Assembles a scheduler from its configuration and injected collaborators
///
/// # Example
/// ```
/// use weather_scheduler_core_rs::{SchedulerConfig, WeatherScheduler};
///
/// let scheduler = WeatherScheduler::builder(SchedulerConfig::with_seed(9))
///     .catalog(["calm", "gale", "squall"], "calm")
///     .build(0)
///     .unwrap();
///
/// assert_eq!(scheduler.catalog().len(), 3);
/// assert_eq!(scheduler.current_variant(), "calm");
/// ```
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    catalog: Option<(Vec<String>, String)>,
    rng: Option<Box<dyn RandomSource>>,
    effects: EffectRegistry,
    event_log_capacity: usize,
}

impl SchedulerBuilder {
    fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            catalog: None,
            rng: None,
            effects: EffectRegistry::new(),
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
        }
    }

    /// Replace the built-in weather catalog. Validated in [`Self::build`].
    pub fn catalog<I, S>(mut self, variants: I, neutral: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalog = Some((
            variants.into_iter().map(Into::into).collect(),
            neutral.into(),
        ));
        self
    }

    /// Use the host's synced generator instead of one seeded from the config
    pub fn random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn effect_consumer(mut self, consumer: Box<dyn EffectConsumer>) -> Self {
        self.effects.register(consumer);
        self
    }

    /// Number of recent events retained by [`WeatherScheduler::event_log`].
    /// Zero turns the log off.
    pub fn event_log_capacity(mut self, capacity: usize) -> Self {
        self.event_log_capacity = capacity;
        self
    }

    /// Validate everything and initialize the scheduler at `now_tick`
    pub fn build(self, now_tick: u64) -> Result<WeatherScheduler, SchedulerError> {
        self.config.validate()?;

        let catalog = match self.catalog {
            Some((variants, neutral)) => Catalog::new(variants, neutral)?,
            None => Catalog::weather(),
        };
        let config_hash = compute_config_hash(&(&self.config, &catalog))?;

        let rng: Box<dyn RandomSource> = match self.rng {
            Some(rng) => rng,
            None => Box::new(XorShiftRng::new(self.config.rng_seed)),
        };

        Ok(WeatherScheduler::initialize(
            self.config,
            catalog,
            rng,
            self.effects,
            EventLog::with_capacity(self.event_log_capacity),
            config_hash,
            now_tick,
        ))
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// The single writer of weather state
///
/// Owns the random source and is the only thing that mutates state. Readers
/// go through [`SchedulerHandle`] (same process) or [`BroadcastReader`]
/// (decoupled consumers); both observe whole snapshots only.
pub struct WeatherScheduler {
    config: SchedulerConfig,
    catalog: Arc<Catalog>,
    rng: Box<dyn RandomSource>,

    /// Game speed used for the next seconds→ticks conversion
    ticks_per_second: u32,

    /// Published snapshot shared with handles
    state: Arc<ArcSwap<SchedulerState>>,

    broadcast: BroadcastPublisher,
    effects: EffectRegistry,
    event_log: EventLog,
    config_hash: String,
}

impl WeatherScheduler {
    /// Scheduler with the default weather catalog and a generator seeded from
    /// `config.rng_seed`
    pub fn new(config: SchedulerConfig, now_tick: u64) -> Result<Self, SchedulerError> {
        Self::builder(config).build(now_tick)
    }

    pub fn builder(config: SchedulerConfig) -> SchedulerBuilder {
        SchedulerBuilder::new(config)
    }

    fn initialize(
        config: SchedulerConfig,
        catalog: Catalog,
        mut rng: Box<dyn RandomSource>,
        effects: EffectRegistry,
        mut event_log: EventLog,
        config_hash: String,
        now_tick: u64,
    ) -> Self {
        let ticks_per_second = config.ticks_per_second;

        // First gap starts at the initial delay, not the minimum interval
        let first_gap = sample_gap_ticks(
            rng.as_mut(),
            config.initial_delay_secs,
            config.max_interval_secs,
            ticks_per_second,
        );
        let next_trigger_tick = now_tick.saturating_add(first_gap);

        let initial = SchedulerState::idle(
            catalog.neutral().clone(),
            next_trigger_tick,
            ticks_per_second,
        );

        event_log.log(SchedulerEvent::Initialized {
            tick: now_tick,
            next_trigger_tick,
            ticks_per_second,
        });

        info!(
            seconds_until_first = ticks_to_seconds(first_gap, ticks_per_second),
            next_trigger_tick,
            variants = catalog.len(),
            "Weather scheduler initialized"
        );

        let broadcast = BroadcastPublisher::new(catalog.neutral().clone());

        Self {
            config,
            catalog: Arc::new(catalog),
            rng,
            ticks_per_second,
            state: Arc::new(ArcSwap::from_pointee(initial)),
            broadcast,
            effects,
            event_log,
            config_hash,
        }
    }

    /// Periodic check. Fires at most one trigger, however late the call is.
    ///
    /// Returns `None` (and changes nothing) while `now_tick` is before the
    /// pending threshold.
    pub fn on_tick(&mut self, now_tick: u64) -> Option<TriggerRecord> {
        let previous = self.state.load_full();
        if !previous.is_due(now_tick) {
            return None;
        }

        let variant = self.select_variant();

        let magnitude = MIN_MAGNITUDE + self.rng.next_f64() * (MAX_MAGNITUDE - MIN_MAGNITUDE);

        let gap_ticks = sample_gap_ticks(
            self.rng.as_mut(),
            self.config.min_interval_secs,
            self.config.max_interval_secs,
            self.ticks_per_second,
        );
        let next_trigger_tick = now_tick.saturating_add(gap_ticks);
        let trigger_count = previous.trigger_count + 1;

        self.state.store(Arc::new(SchedulerState {
            current_variant: variant.clone(),
            magnitude,
            last_trigger_tick: now_tick,
            next_trigger_tick,
            active: true,
            trigger_count,
            ticks_per_second: self.ticks_per_second,
        }));
        let sequence = self.broadcast.publish(variant.clone(), magnitude, now_tick);

        self.event_log.log(SchedulerEvent::Triggered {
            tick: now_tick,
            variant: variant.clone(),
            magnitude,
            next_trigger_tick,
            trigger_count,
        });

        info!(
            %variant,
            magnitude,
            seconds_until_next = ticks_to_seconds(gap_ticks, self.ticks_per_second),
            trigger_count,
            "Weather event triggered"
        );

        self.effects.dispatch(&variant, magnitude);

        Some(TriggerRecord {
            tick: now_tick,
            variant,
            magnitude,
            next_trigger_tick,
            gap_ticks,
            trigger_count,
            sequence,
        })
    }

    /// Uniform draw from the catalog
    ///
    /// An out-of-range draw from the random source is reduced modulo the
    /// catalog length so every peer still lands on the same variant.
    fn select_variant(&mut self) -> VariantId {
        let len = self.catalog.len();
        let drawn = self.rng.range(0, len as i64);
        debug_assert!(
            (0..len as i64).contains(&drawn),
            "random source returned {} outside 0..{}",
            drawn,
            len
        );
        let index = drawn.rem_euclid(len as i64) as usize;
        self.catalog.variants()[index].clone()
    }

    /// Change the game speed for future conversions
    ///
    /// The pending `next_trigger_tick` keeps the tick value it was computed
    /// with.
    pub fn set_ticks_per_second(
        &mut self,
        now_tick: u64,
        ticks_per_second: u32,
    ) -> Result<(), SchedulerError> {
        if ticks_per_second == 0 {
            return Err(SchedulerError::InvalidTickRate);
        }
        let old = self.ticks_per_second;
        if old == ticks_per_second {
            return Ok(());
        }

        self.ticks_per_second = ticks_per_second;
        let mut updated = SchedulerState::clone(&self.state.load_full());
        updated.ticks_per_second = ticks_per_second;
        self.state.store(Arc::new(updated));

        self.event_log.log(SchedulerEvent::TickRateChanged {
            tick: now_tick,
            old_ticks_per_second: old,
            new_ticks_per_second: ticks_per_second,
        });
        debug!(
            old_ticks_per_second = old,
            new_ticks_per_second = ticks_per_second,
            "Game speed changed"
        );
        Ok(())
    }

    pub fn register_consumer(&mut self, consumer: Box<dyn EffectConsumer>) {
        self.effects.register(consumer);
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Current snapshot
    pub fn state(&self) -> Arc<SchedulerState> {
        self.state.load_full()
    }

    pub fn current_variant(&self) -> VariantId {
        self.state.load().current_variant.clone()
    }

    pub fn magnitude(&self) -> f64 {
        self.state.load().magnitude
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.state.load().phase()
    }

    /// `max(0, next_trigger_tick - now_tick) / ticks_per_second`
    pub fn seconds_until_next(&self, now_tick: u64, ticks_per_second: u32) -> f64 {
        self.state.load().seconds_until_next(now_tick, ticks_per_second)
    }

    /// Catalog in selection order
    pub fn catalog(&self) -> &[VariantId] {
        self.catalog.variants()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    /// Read-only direct query handle for in-process collaborators
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle::new(Arc::clone(&self.state), Arc::clone(&self.catalog))
    }

    /// Read side of the key/value broadcast
    pub fn broadcast(&self) -> BroadcastReader {
        self.broadcast.reader()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    // ------------------------------------------------------------------------
    // Determinism fingerprints
    // ------------------------------------------------------------------------

    /// SHA-256 of the config and catalog; equal on every correctly set up peer
    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    pub fn rng_state(&self) -> Option<RngState> {
        self.rng.state()
    }

    /// SHA-256 of the state and generator position; diverges on desync
    pub fn state_digest(&self) -> Result<String, SchedulerError> {
        compute_state_digest(&self.state.load(), self.rng.state())
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            state: SchedulerState::clone(&self.state.load_full()),
            rng: self.rng.state(),
            config_hash: self.config_hash.clone(),
        }
    }
}

impl std::fmt::Debug for WeatherScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherScheduler")
            .field("config", &self.config)
            .field("ticks_per_second", &self.ticks_per_second)
            .field("state", &*self.state.load_full())
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}

/// Draw a gap in `[low_secs, high_secs]` and convert it to at least one tick
fn sample_gap_ticks(
    rng: &mut dyn RandomSource,
    low_secs: f64,
    high_secs: f64,
    ticks_per_second: u32,
) -> u64 {
    let seconds = rng.uniform(low_secs, high_secs);
    seconds_to_ticks(seconds, ticks_per_second).max(1)
}
