//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust scheduler types and Python dicts.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::broadcast::WeatherBroadcast;
use crate::models::state::SchedulerState;
use crate::scheduler::{SchedulerConfig, TriggerRecord};

fn value_error(msg: impl Into<String>) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(msg.into())
}

/// Extract a field with a default value if missing.
///
/// Errors only on type conversion failure, never on absence.
fn extract_with_default<T>(dict: &Bound<'_, PyDict>, key: &str, default: T) -> PyResult<T>
where
    for<'py> T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

/// Convert an optional Python dict to a validated `SchedulerConfig`
///
/// Absent keys take the Rust defaults.
pub fn parse_scheduler_config(py_config: Option<&Bound<'_, PyDict>>) -> PyResult<SchedulerConfig> {
    let defaults = SchedulerConfig::default();
    let config = match py_config {
        None => defaults,
        Some(dict) => SchedulerConfig {
            min_interval_secs: extract_with_default(
                dict,
                "min_interval_secs",
                defaults.min_interval_secs,
            )?,
            max_interval_secs: extract_with_default(
                dict,
                "max_interval_secs",
                defaults.max_interval_secs,
            )?,
            initial_delay_secs: extract_with_default(
                dict,
                "initial_delay_secs",
                defaults.initial_delay_secs,
            )?,
            ticks_per_second: extract_with_default(
                dict,
                "ticks_per_second",
                defaults.ticks_per_second,
            )?,
            update_interval: extract_with_default(
                dict,
                "update_interval",
                defaults.update_interval,
            )?,
            rng_seed: extract_with_default(dict, "rng_seed", defaults.rng_seed)?,
        },
    };

    config.validate().map_err(|e| value_error(e.to_string()))?;
    Ok(config)
}

pub fn state_to_py(py: Python, state: &SchedulerState) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("current_variant", state.current_variant.as_str())?;
    dict.set_item("magnitude", state.magnitude)?;
    dict.set_item("last_trigger_tick", state.last_trigger_tick)?;
    dict.set_item("next_trigger_tick", state.next_trigger_tick)?;
    dict.set_item("active", state.active)?;
    dict.set_item("trigger_count", state.trigger_count)?;
    dict.set_item("ticks_per_second", state.ticks_per_second)?;
    Ok(dict.unbind())
}

pub fn trigger_to_py(py: Python, record: &TriggerRecord) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("tick", record.tick)?;
    dict.set_item("variant", record.variant.as_str())?;
    dict.set_item("magnitude", record.magnitude)?;
    dict.set_item("next_trigger_tick", record.next_trigger_tick)?;
    dict.set_item("gap_ticks", record.gap_ticks)?;
    dict.set_item("trigger_count", record.trigger_count)?;
    dict.set_item("sequence", record.sequence)?;
    Ok(dict.unbind())
}

/// Broadcast keys as a plain dict (`weather_current`, `weather_intensity`,
/// `weather_frame`)
pub fn broadcast_to_py<'py>(
    py: Python<'py>,
    broadcast: &WeatherBroadcast,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item(
        crate::broadcast::WEATHER_CURRENT,
        broadcast.weather_current.as_str(),
    )?;
    dict.set_item(crate::broadcast::WEATHER_INTENSITY, broadcast.weather_intensity)?;
    dict.set_item(crate::broadcast::WEATHER_FRAME, broadcast.weather_frame)?;
    Ok(dict)
}
