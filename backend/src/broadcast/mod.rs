//! Decoupled key/value broadcast of the current weather
//!
//! Consumers that cannot hold a reference to the scheduler (other threads,
//! scripting layers, FFI callers) poll a [`BroadcastReader`]. The scheduler
//! owns the only [`BroadcastPublisher`] and replaces the whole
//! [`WeatherBroadcast`] at each trigger, so the three keys always describe the
//! same trigger. Last write wins; there is no queue and no backpressure.
//!
//! An unset slot is not an error: readers get the neutral variant, zero
//! intensity and frame zero.

use crate::models::catalog::VariantId;
use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Key for the current variant identifier
pub const WEATHER_CURRENT: &str = "weather_current";
/// Key for the current magnitude
pub const WEATHER_INTENSITY: &str = "weather_intensity";
/// Key for the tick of the last trigger
pub const WEATHER_FRAME: &str = "weather_frame";

#[derive(Debug, Error, PartialEq)]
#[error("unknown broadcast key '{0}'")]
pub struct UnknownKey(pub String);

/// The named slots of the broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BroadcastKey {
    WeatherCurrent,
    WeatherIntensity,
    WeatherFrame,
}

impl BroadcastKey {
    pub const ALL: [BroadcastKey; 3] = [
        BroadcastKey::WeatherCurrent,
        BroadcastKey::WeatherIntensity,
        BroadcastKey::WeatherFrame,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastKey::WeatherCurrent => WEATHER_CURRENT,
            BroadcastKey::WeatherIntensity => WEATHER_INTENSITY,
            BroadcastKey::WeatherFrame => WEATHER_FRAME,
        }
    }
}

impl fmt::Display for BroadcastKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BroadcastKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            WEATHER_CURRENT => Ok(BroadcastKey::WeatherCurrent),
            WEATHER_INTENSITY => Ok(BroadcastKey::WeatherIntensity),
            WEATHER_FRAME => Ok(BroadcastKey::WeatherFrame),
            other => Err(UnknownKey(other.to_string())),
        }
    }
}

/// Loosely-typed value of one broadcast key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BroadcastValue {
    Text(String),
    Float(f64),
    Integer(u64),
}

/// One publication: all three keys plus a sequence number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherBroadcast {
    pub weather_current: VariantId,
    pub weather_intensity: f64,
    pub weather_frame: u64,
    /// 1 for the first publication, incremented on each one after
    pub sequence: u64,
}

impl WeatherBroadcast {
    pub fn value(&self, key: BroadcastKey) -> BroadcastValue {
        match key {
            BroadcastKey::WeatherCurrent => {
                BroadcastValue::Text(self.weather_current.as_str().to_string())
            }
            BroadcastKey::WeatherIntensity => BroadcastValue::Float(self.weather_intensity),
            BroadcastKey::WeatherFrame => BroadcastValue::Integer(self.weather_frame),
        }
    }
}

#[derive(Debug)]
struct Slot {
    latest: ArcSwapOption<WeatherBroadcast>,
    neutral: VariantId,
}

/// Write side of the broadcast. Owned by the scheduler; not cloneable.
#[derive(Debug)]
pub struct BroadcastPublisher {
    slot: Arc<Slot>,
    sequence: u64,
}

impl BroadcastPublisher {
    /// Empty broadcast whose readers fall back to `neutral`
    pub fn new(neutral: VariantId) -> Self {
        Self {
            slot: Arc::new(Slot {
                latest: ArcSwapOption::from(None),
                neutral,
            }),
            sequence: 0,
        }
    }

    /// Replace all keys in one atomic store. Returns the new sequence number.
    pub fn publish(&mut self, current: VariantId, intensity: f64, frame: u64) -> u64 {
        self.sequence += 1;
        self.slot.latest.store(Some(Arc::new(WeatherBroadcast {
            weather_current: current,
            weather_intensity: intensity,
            weather_frame: frame,
            sequence: self.sequence,
        })));
        self.sequence
    }

    pub fn reader(&self) -> BroadcastReader {
        BroadcastReader {
            slot: Arc::clone(&self.slot),
        }
    }
}

/// Read side of the broadcast; cheap to clone and safe to share across threads
///
/// # Example
/// ```
/// use weather_scheduler_core_rs::broadcast::{BroadcastPublisher, BroadcastValue};
/// use weather_scheduler_core_rs::VariantId;
///
/// let mut publisher = BroadcastPublisher::new(VariantId::from("clear_skies"));
/// let reader = publisher.reader();
/// assert_eq!(reader.current(), "clear_skies");
///
/// publisher.publish(VariantId::from("fog"), 0.8, 1200);
/// assert_eq!(
///     reader.get_by_name("weather_frame"),
///     Some(BroadcastValue::Integer(1200))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct BroadcastReader {
    slot: Arc<Slot>,
}

impl BroadcastReader {
    /// Latest publication, or `None` before the first trigger
    pub fn snapshot(&self) -> Option<Arc<WeatherBroadcast>> {
        self.slot.latest.load_full()
    }

    /// Latest publication with defaults applied when nothing was published yet
    pub fn snapshot_or_default(&self) -> WeatherBroadcast {
        match self.snapshot() {
            Some(latest) => (*latest).clone(),
            None => WeatherBroadcast {
                weather_current: self.slot.neutral.clone(),
                weather_intensity: 0.0,
                weather_frame: 0,
                sequence: 0,
            },
        }
    }

    pub fn current(&self) -> VariantId {
        self.snapshot()
            .map(|b| b.weather_current.clone())
            .unwrap_or_else(|| self.slot.neutral.clone())
    }

    pub fn intensity(&self) -> f64 {
        self.snapshot().map_or(0.0, |b| b.weather_intensity)
    }

    pub fn frame(&self) -> u64 {
        self.snapshot().map_or(0, |b| b.weather_frame)
    }

    /// Sequence number of the latest publication (0 if none)
    pub fn sequence(&self) -> u64 {
        self.snapshot().map_or(0, |b| b.sequence)
    }

    /// True if something was published after `seen_sequence`
    pub fn has_changed_since(&self, seen_sequence: u64) -> bool {
        self.sequence() > seen_sequence
    }

    pub fn get(&self, key: BroadcastKey) -> BroadcastValue {
        self.snapshot_or_default().value(key)
    }

    /// String-keyed lookup; `None` for keys outside the broadcast
    pub fn get_by_name(&self, key: &str) -> Option<BroadcastValue> {
        key.parse::<BroadcastKey>().ok().map(|k| self.get(k))
    }

    /// All keys read from a single publication
    pub fn entries(&self) -> Vec<(BroadcastKey, BroadcastValue)> {
        let latest = self.snapshot_or_default();
        BroadcastKey::ALL
            .iter()
            .map(|key| (*key, latest.value(*key)))
            .collect()
    }
}
