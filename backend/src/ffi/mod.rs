//! Python bindings (`pyo3` feature)
//!
//! Exposes the direct query API and the broadcast keys to Python hosts.

pub mod scheduler;
pub mod types;
