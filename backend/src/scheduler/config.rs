//! Scheduler configuration
//!
//! Loaded once at start and never re-read. Every peer must run with an
//! identical configuration; see [`crate::scheduler::sync::compute_config_hash`].

use crate::core::time::DEFAULT_TICKS_PER_SECOND;
use crate::scheduler::engine::SchedulerError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_INTERVAL_SECS: f64 = 120.0;
pub const DEFAULT_MAX_INTERVAL_SECS: f64 = 900.0;
pub const DEFAULT_INITIAL_DELAY_SECS: f64 = 60.0;
pub const DEFAULT_UPDATE_INTERVAL: u64 = 10;

/// Longest accepted duration. At any `u32` tick rate its tick count stays
/// well inside `u64`.
pub const MAX_DURATION_SECS: f64 = 1.0e9;

/// Complete scheduler configuration
///
/// # Fields
///
/// * `min_interval_secs` / `max_interval_secs` - Bounds of the gap between triggers
/// * `initial_delay_secs` - Earliest possible first trigger
/// * `ticks_per_second` - Game speed at start
/// * `update_interval` - Ticks between `on_tick` checks
/// * `rng_seed` - Shared seed; all peers must agree on it
///
/// # Example
/// ```
/// use weather_scheduler_core_rs::SchedulerConfig;
///
/// let config = SchedulerConfig::from_json_str(r#"{"rng_seed": 7, "min_interval_secs": 30}"#).unwrap();
/// assert_eq!(config.rng_seed, 7);
/// assert_eq!(config.min_interval_secs, 30.0);
/// assert_eq!(config.max_interval_secs, 900.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub min_interval_secs: f64,
    pub max_interval_secs: f64,
    pub initial_delay_secs: f64,
    pub ticks_per_second: u32,
    pub update_interval: u64,
    pub rng_seed: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: DEFAULT_MIN_INTERVAL_SECS,
            max_interval_secs: DEFAULT_MAX_INTERVAL_SECS,
            initial_delay_secs: DEFAULT_INITIAL_DELAY_SECS,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            rng_seed: 0,
        }
    }
}

impl SchedulerConfig {
    /// Defaults with the given seed
    pub fn with_seed(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document; absent fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, SchedulerError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SchedulerError::Serialization(format!("Config parse failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject inconsistent settings. Nothing is clamped.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        let durations = [
            ("min_interval_secs", self.min_interval_secs),
            ("max_interval_secs", self.max_interval_secs),
            ("initial_delay_secs", self.initial_delay_secs),
        ];
        for (field, value) in durations {
            if !value.is_finite() {
                return Err(SchedulerError::NonFiniteDuration { field, value });
            }
            if value < 0.0 {
                return Err(SchedulerError::NegativeDuration { field, value });
            }
            if value > MAX_DURATION_SECS {
                return Err(SchedulerError::DurationTooLarge {
                    field,
                    value,
                    max: MAX_DURATION_SECS,
                });
            }
        }

        if self.min_interval_secs > self.max_interval_secs {
            return Err(SchedulerError::InvalidInterval {
                min: self.min_interval_secs,
                max: self.max_interval_secs,
            });
        }

        if self.initial_delay_secs > self.max_interval_secs {
            return Err(SchedulerError::InitialDelayExceedsMax {
                initial_delay: self.initial_delay_secs,
                max: self.max_interval_secs,
            });
        }

        if self.ticks_per_second == 0 {
            return Err(SchedulerError::InvalidTickRate);
        }

        if self.update_interval == 0 {
            return Err(SchedulerError::InvalidUpdateInterval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::seconds_to_ticks;

    #[test]
    fn test_defaults_are_valid() {
        let config = SchedulerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_interval_secs, 120.0);
        assert_eq!(config.max_interval_secs, 900.0);
        assert_eq!(config.initial_delay_secs, 60.0);
        assert_eq!(config.ticks_per_second, 30);
        assert_eq!(config.update_interval, 10);
    }

    #[test]
    fn test_min_greater_than_max_rejected() {
        let config = SchedulerConfig {
            min_interval_secs: 1000.0,
            ..SchedulerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SchedulerError::InvalidInterval {
                min: 1000.0,
                max: 900.0
            })
        );
    }

    #[test]
    fn test_negative_duration_rejected() {
        let config = SchedulerConfig {
            initial_delay_secs: -1.0,
            ..SchedulerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SchedulerError::NegativeDuration {
                field: "initial_delay_secs",
                value: -1.0
            })
        );
    }

    #[test]
    fn test_nan_rejected() {
        let config = SchedulerConfig {
            max_interval_secs: f64::NAN,
            ..SchedulerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SchedulerError::NonFiniteDuration {
                field: "max_interval_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_initial_delay_beyond_max_rejected() {
        let config = SchedulerConfig {
            initial_delay_secs: 901.0,
            ..SchedulerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SchedulerError::InitialDelayExceedsMax { .. })
        ));
    }

    #[test]
    fn test_zero_rates_rejected() {
        let no_speed = SchedulerConfig {
            ticks_per_second: 0,
            ..SchedulerConfig::default()
        };
        assert_eq!(no_speed.validate(), Err(SchedulerError::InvalidTickRate));

        let no_cadence = SchedulerConfig {
            update_interval: 0,
            ..SchedulerConfig::default()
        };
        assert_eq!(
            no_cadence.validate(),
            Err(SchedulerError::InvalidUpdateInterval)
        );
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        assert!(matches!(
            SchedulerConfig::from_json_str("{not json"),
            Err(SchedulerError::Serialization(_))
        ));
    }

    #[test]
    fn test_json_validation_runs() {
        assert!(matches!(
            SchedulerConfig::from_json_str(r#"{"min_interval_secs": 5000}"#),
            Err(SchedulerError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn test_durations_beyond_tick_range_rejected() {
        let huge_max = SchedulerConfig {
            min_interval_secs: 0.0,
            max_interval_secs: 1e30,
            initial_delay_secs: 1e30,
            ..SchedulerConfig::default()
        };
        assert!(matches!(
            huge_max.validate(),
            Err(SchedulerError::DurationTooLarge {
                field: "max_interval_secs",
                ..
            })
        ));

        let huge_min = SchedulerConfig {
            min_interval_secs: 1e30,
            max_interval_secs: 1e30,
            initial_delay_secs: 0.0,
            ..SchedulerConfig::default()
        };
        assert!(matches!(
            huge_min.validate(),
            Err(SchedulerError::DurationTooLarge {
                field: "min_interval_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_longest_duration_fits_fastest_tick_rate() {
        let config = SchedulerConfig {
            min_interval_secs: MAX_DURATION_SECS,
            max_interval_secs: MAX_DURATION_SECS,
            initial_delay_secs: MAX_DURATION_SECS,
            ticks_per_second: u32::MAX,
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_ok());

        let ticks = seconds_to_ticks(MAX_DURATION_SECS, u32::MAX);
        assert!(ticks < u64::MAX / 2);
    }
}
