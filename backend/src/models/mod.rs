//! Domain models for the weather scheduler

pub mod catalog;
pub mod event;
pub mod state;

// Re-exports
pub use catalog::{Catalog, CatalogError, VariantId};
pub use event::{EventLog, SchedulerEvent, DEFAULT_EVENT_LOG_CAPACITY};
pub use state::{SchedulerPhase, SchedulerState};
