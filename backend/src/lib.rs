//! Weather Scheduler Core - Rust Engine
//!
//! Deterministic, globally synchronized scheduler for recurring weather
//! events. Decides when an event fires, which variant it is and how strong it
//! is, then publishes that decision to any number of read-only consumers.
//!
//! # Architecture
//!
//! - **core**: Tick clock and seconds↔ticks conversion
//! - **rng**: Deterministic random number generation
//! - **models**: Domain types (catalog, state snapshot, event log)
//! - **scheduler**: Trigger engine, direct query handle, host tick driver
//! - **broadcast**: Decoupled key/value publication
//! - **effects**: Consumer capability invoked on every trigger
//!
//! # Critical Invariants
//!
//! 1. All timing is integer ticks (u64)
//! 2. All randomness is deterministic (seeded RNG, fixed draw order)
//! 3. Readers only ever observe whole snapshots
//! 4. At most one trigger per `on_tick` call

// Module declarations
pub mod broadcast;
pub mod core;
pub mod effects;
pub mod models;
pub mod rng;
pub mod scheduler;

// Re-exports for convenience
pub use broadcast::{BroadcastKey, BroadcastReader, BroadcastValue, WeatherBroadcast};
pub use core::time::TickClock;
pub use effects::EffectConsumer;
pub use models::{Catalog, EventLog, SchedulerEvent, SchedulerPhase, SchedulerState, VariantId};
pub use rng::{RandomSource, RngState, XorShiftRng};
pub use scheduler::{
    SchedulerConfig, SchedulerError, SchedulerHandle, TickDriver, TriggerRecord, WeatherScheduler,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn weather_scheduler_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::scheduler::PyWeatherScheduler>()?;
    Ok(())
}
