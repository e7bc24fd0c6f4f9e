//! Determinism fingerprints
//!
//! Peers never negotiate; they recompute. These hashes let operators confirm
//! that two peers were started identically (config hash) and are still in
//! lockstep (state digest) by comparing short strings out-of-band.
//!
//! Hashing uses canonical JSON with recursively sorted object keys, then
//! SHA-256, so the result does not depend on map iteration order.

use crate::models::state::SchedulerState;
use crate::rng::RngState;
use crate::scheduler::engine::SchedulerError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Diagnostic capture of everything that determines future triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    pub state: SchedulerState,
    pub rng: Option<RngState>,
    pub config_hash: String,
}

impl SyncSnapshot {
    /// Digest of the state and generator position
    pub fn digest(&self) -> Result<String, SchedulerError> {
        compute_state_digest(&self.state, self.rng)
    }
}

/// SHA-256 over the canonical JSON form of `value`
pub fn compute_config_hash<T: Serialize>(value: &T) -> Result<String, SchedulerError> {
    hash_canonical(value, "Config")
}

/// SHA-256 over the state and (if available) generator position
pub fn compute_state_digest(
    state: &SchedulerState,
    rng: Option<RngState>,
) -> Result<String, SchedulerError> {
    hash_canonical(&(state, rng), "State")
}

fn hash_canonical<T: Serialize>(value: &T, what: &str) -> Result<String, SchedulerError> {
    let value = serde_json::to_value(value).map_err(|e| {
        SchedulerError::Serialization(format!("{} serialization failed: {}", what, e))
    })?;

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SchedulerError::Serialization(format!("{} serialization failed: {}", what, e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
