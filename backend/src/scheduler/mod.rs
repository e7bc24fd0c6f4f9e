//! Scheduler - trigger timing, selection and publication
//!
//! See `engine.rs` for the trigger algorithm.

pub mod config;
pub mod driver;
pub mod engine;
pub mod handle;
pub mod sync;

// Re-export main types for convenience
pub use config::{SchedulerConfig, MAX_DURATION_SECS};
pub use driver::TickDriver;
pub use engine::{
    SchedulerBuilder, SchedulerError, TriggerRecord, WeatherScheduler, MAX_MAGNITUDE,
    MIN_MAGNITUDE,
};
pub use handle::SchedulerHandle;
pub use sync::{compute_config_hash, compute_state_digest, SyncSnapshot};
