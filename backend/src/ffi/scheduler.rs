//! PyO3 wrapper for WeatherScheduler
//!
//! # Example (from Python)
//!
//! ```python
//! from weather_scheduler_core_rs import WeatherScheduler
//!
//! sched = WeatherScheduler({"rng_seed": 42}, now_tick=0)
//! for tick in range(0, 30 * 3600, 10):
//!     fired = sched.on_tick(tick)
//!     if fired is not None:
//!         print(fired["variant"], fired["magnitude"])
//! ```

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{broadcast_to_py, parse_scheduler_config, state_to_py, trigger_to_py};
use crate::broadcast::BroadcastReader;
use crate::scheduler::WeatherScheduler;

fn runtime_error(msg: String) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(msg)
}

#[pyclass(name = "WeatherScheduler", unsendable)]
pub struct PyWeatherScheduler {
    inner: WeatherScheduler,
    broadcast: BroadcastReader,
}

#[pymethods]
impl PyWeatherScheduler {
    /// Create and initialize a scheduler
    ///
    /// Raises ValueError on an invalid configuration.
    #[new]
    #[pyo3(signature = (config=None, now_tick=0))]
    fn new(config: Option<&Bound<'_, PyDict>>, now_tick: u64) -> PyResult<Self> {
        let rust_config = parse_scheduler_config(config)?;
        let inner = WeatherScheduler::new(rust_config, now_tick)
            .map_err(|e| runtime_error(format!("Failed to create scheduler: {}", e)))?;
        let broadcast = inner.broadcast();
        Ok(Self { inner, broadcast })
    }

    /// Periodic check; returns the trigger as a dict, or None
    fn on_tick(&mut self, py: Python, now_tick: u64) -> PyResult<Option<Py<PyDict>>> {
        self.inner
            .on_tick(now_tick)
            .map(|record| trigger_to_py(py, &record))
            .transpose()
    }

    fn set_ticks_per_second(&mut self, now_tick: u64, ticks_per_second: u32) -> PyResult<()> {
        self.inner
            .set_ticks_per_second(now_tick, ticks_per_second)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
    }

    // ========================================================================
    // Direct query API
    // ========================================================================

    fn get_weather_state(&self, py: Python) -> PyResult<Py<PyDict>> {
        state_to_py(py, &self.inner.state())
    }

    fn get_current_weather(&self) -> String {
        self.inner.current_variant().to_string()
    }

    fn get_weather_intensity(&self) -> f64 {
        self.inner.magnitude()
    }

    fn get_time_until_next_event(&self, now_tick: u64) -> f64 {
        self.inner
            .seconds_until_next(now_tick, self.inner.ticks_per_second())
    }

    fn get_available_weather_events(&self) -> Vec<String> {
        self.inner.catalog().iter().map(|v| v.to_string()).collect()
    }

    // ========================================================================
    // Broadcast
    // ========================================================================

    /// All broadcast keys, with defaults before the first trigger
    fn get_broadcast(&self, py: Python) -> PyResult<Py<PyDict>> {
        Ok(broadcast_to_py(py, &self.broadcast.snapshot_or_default())?.unbind())
    }

    /// One broadcast key; raises KeyError for unknown keys
    fn get_broadcast_value(&self, py: Python, key: &str) -> PyResult<PyObject> {
        let entries = broadcast_to_py(py, &self.broadcast.snapshot_or_default())?;
        entries
            .get_item(key)?
            .map(Bound::unbind)
            .ok_or_else(|| {
                PyErr::new::<pyo3::exceptions::PyKeyError, _>(format!(
                    "unknown broadcast key '{}'",
                    key
                ))
            })
    }

    // ========================================================================
    // Determinism fingerprints
    // ========================================================================

    fn config_hash(&self) -> String {
        self.inner.config_hash().to_string()
    }

    fn state_digest(&self) -> PyResult<String> {
        self.inner
            .state_digest()
            .map_err(|e| runtime_error(e.to_string()))
    }
}
