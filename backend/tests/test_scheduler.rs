//! Scheduler behaviour tests
//!
//! Trigger timing, selection, idle defaults and the Idle -> Active lifecycle.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use weather_scheduler_core_rs::broadcast::WEATHER_FRAME;
use weather_scheduler_core_rs::{
    BroadcastValue, RandomSource, SchedulerConfig, SchedulerEvent, SchedulerPhase, VariantId,
    WeatherScheduler,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Random source that replays scripted draws, then falls back to the
/// lowest value of each range
struct ScriptedRandom {
    units: VecDeque<f64>,
    indices: VecDeque<i64>,
}

impl ScriptedRandom {
    fn new(units: &[f64], indices: &[i64]) -> Self {
        Self {
            units: units.iter().copied().collect(),
            indices: indices.iter().copied().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(0.0)
    }

    fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");
        self.indices
            .pop_front()
            .map(|i| min + i)
            .unwrap_or(min)
    }
}

/// Unit draw that makes `uniform(low, high)` land on `target`
fn unit_for(target: f64, low: f64, high: f64) -> f64 {
    (target - low) / (high - low)
}

fn heavy_rain_index() -> i64 {
    weather_scheduler_core_rs::Catalog::weather()
        .variants()
        .iter()
        .position(|v| v == "heavy_rain")
        .unwrap() as i64
}

fn scripted_scheduler(units: &[f64], indices: &[i64]) -> WeatherScheduler {
    WeatherScheduler::builder(SchedulerConfig::default())
        .random_source(Box::new(ScriptedRandom::new(units, indices)))
        .build(0)
        .unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_heavy_rain_scenario() {
    // First gap 120s, then heavy_rain at 0.75, then a 510s gap
    let scheduler_units = [
        unit_for(120.0, 60.0, 900.0),
        0.5,
        unit_for(510.0, 120.0, 900.0),
    ];
    let mut scheduler = scripted_scheduler(&scheduler_units, &[heavy_rain_index()]);
    let handle = scheduler.handle();
    let broadcast = scheduler.broadcast();

    assert_eq!(scheduler.state().next_trigger_tick, 3600);
    assert!(scheduler.on_tick(3590).is_none());

    let record = scheduler.on_tick(3600).expect("trigger due at 3600");

    assert_eq!(record.variant, "heavy_rain");
    assert_eq!(record.magnitude, 0.75);
    assert_eq!(handle.current_weather(), "heavy_rain");
    assert_eq!(handle.weather_intensity(), 0.75);
    assert_eq!(
        broadcast.get_by_name(WEATHER_FRAME),
        Some(BroadcastValue::Integer(3600))
    );
    assert_eq!(record.next_trigger_tick, 3600 + 510 * 30);
    assert_eq!(handle.time_until_next_event(3600), 510.0);
}

#[test]
fn test_idle_defaults() {
    let scheduler = WeatherScheduler::new(SchedulerConfig::with_seed(1), 0).unwrap();
    let handle = scheduler.handle();

    assert_eq!(handle.current_weather(), "clear_skies");
    assert_eq!(handle.weather_intensity(), 0.0);
    assert!(handle.time_until_next_event(0) > 0.0);
    assert_eq!(handle.phase(), SchedulerPhase::Idle);

    let state = handle.weather_state();
    assert!(!state.active);
    assert_eq!(state.last_trigger_tick, 0);
    assert!(state.next_trigger_tick > state.last_trigger_tick);
}

#[test]
fn test_checks_before_threshold_never_mutate() {
    let mut scheduler = WeatherScheduler::new(SchedulerConfig::with_seed(8), 0).unwrap();
    let before = scheduler.state();
    let rng_before = scheduler.rng_state();
    let next = before.next_trigger_tick;

    for tick in (0..next).step_by(10) {
        assert!(scheduler.on_tick(tick).is_none());
    }

    assert_eq!(*scheduler.state(), *before);
    assert_eq!(scheduler.rng_state(), rng_before);
    assert_eq!(scheduler.event_log().len(), 1);
}

#[test]
fn test_far_jump_fires_exactly_once() {
    let mut scheduler = WeatherScheduler::new(SchedulerConfig::with_seed(21), 0).unwrap();
    let due = scheduler.state().next_trigger_tick;
    let far = due + 10_000_000;

    let record = scheduler.on_tick(far).expect("late check still fires");
    assert_eq!(record.tick, far);
    assert_eq!(record.trigger_count, 1);
    assert!(record.next_trigger_tick > far);

    assert!(scheduler.on_tick(far).is_none());
    assert_eq!(scheduler.event_log().triggers().count(), 1);
}

#[test]
fn test_idle_to_active_happens_once() {
    let mut scheduler = WeatherScheduler::new(SchedulerConfig::with_seed(4), 0).unwrap();
    assert_eq!(scheduler.phase(), SchedulerPhase::Idle);

    for expected_count in 1..=5 {
        let due = scheduler.state().next_trigger_tick;
        let record = scheduler.on_tick(due).unwrap();
        assert_eq!(record.trigger_count, expected_count);
        assert_eq!(scheduler.phase(), SchedulerPhase::Active);
        assert!(scheduler.state().active);
    }
}

#[test]
fn test_late_joiner_initializes_relative_to_now() {
    let scheduler = WeatherScheduler::new(SchedulerConfig::with_seed(2), 50_000).unwrap();
    let state = scheduler.state();

    assert_eq!(state.last_trigger_tick, 0);
    assert!(state.next_trigger_tick >= 50_000 + 60 * 30);
    assert!(state.next_trigger_tick <= 50_000 + 900 * 30);
}

#[test]
fn test_same_seed_same_timeline() {
    let run = |seed: u64| {
        let mut scheduler = WeatherScheduler::new(SchedulerConfig::with_seed(seed), 0).unwrap();
        (0..20)
            .map(|_| {
                let due = scheduler.state().next_trigger_tick;
                scheduler.on_tick(due).unwrap()
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(run(1234), run(1234));
    assert_ne!(run(1234), run(4321));
}

#[test]
fn test_selection_stays_inside_custom_catalog() {
    let mut scheduler = WeatherScheduler::builder(SchedulerConfig::with_seed(77))
        .catalog(["calm", "gale", "squall"], "calm")
        .build(0)
        .unwrap();

    for _ in 0..50 {
        let due = scheduler.state().next_trigger_tick;
        let record = scheduler.on_tick(due).unwrap();
        assert!(
            ["calm", "gale", "squall"].contains(&record.variant.as_str()),
            "unexpected variant {}",
            record.variant
        );
    }
    assert_eq!(
        scheduler.catalog(),
        &[
            VariantId::from("calm"),
            VariantId::from("gale"),
            VariantId::from("squall")
        ]
    );
}

#[test]
fn test_consecutive_repeats_allowed() {
    // Single-variant catalog: every trigger repeats the previous variant
    let mut scheduler = WeatherScheduler::builder(SchedulerConfig::with_seed(5))
        .catalog(["drizzle"], "drizzle")
        .build(0)
        .unwrap();

    for _ in 0..3 {
        let due = scheduler.state().next_trigger_tick;
        assert_eq!(scheduler.on_tick(due).unwrap().variant, "drizzle");
    }
}

// ============================================================================
// Effect consumers
// ============================================================================

#[test]
fn test_consumers_see_published_state() {
    let mut scheduler = WeatherScheduler::new(SchedulerConfig::with_seed(31), 0).unwrap();
    let handle = scheduler.handle();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    scheduler.register_consumer(Box::new(move |variant: &VariantId, magnitude: f64| {
        // State is already published when consumers run
        assert_eq!(handle.current_weather(), *variant);
        assert_eq!(handle.weather_intensity(), magnitude);
        sink.lock().unwrap().push((variant.clone(), magnitude));
    }));

    let mut records = Vec::new();
    for _ in 0..3 {
        let due = scheduler.state().next_trigger_tick;
        records.push(scheduler.on_tick(due).unwrap());
    }

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    for (record, (variant, magnitude)) in records.iter().zip(seen.iter()) {
        assert_eq!(&record.variant, variant);
        assert_eq!(record.magnitude, *magnitude);
    }
}

#[test]
fn test_consumers_not_called_without_trigger() {
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);

    let mut scheduler = WeatherScheduler::builder(SchedulerConfig::with_seed(3))
        .effect_consumer(Box::new(move |_: &VariantId, _: f64| {
            *counter.lock().unwrap() += 1;
        }))
        .build(0)
        .unwrap();

    scheduler.on_tick(0);
    scheduler.on_tick(10);
    assert_eq!(*calls.lock().unwrap(), 0);
}

// ============================================================================
// Game speed
// ============================================================================

#[test]
fn test_speed_change_does_not_rescale_pending_threshold() {
    let units = [
        unit_for(120.0, 60.0, 900.0),
        0.0,
        unit_for(120.0, 120.0, 900.0),
    ];
    let mut scheduler = scripted_scheduler(&units, &[0]);
    assert_eq!(scheduler.state().next_trigger_tick, 3600);

    scheduler.set_ticks_per_second(100, 60).unwrap();

    // Pending threshold keeps its tick value
    assert_eq!(scheduler.state().next_trigger_tick, 3600);
    assert_eq!(scheduler.state().ticks_per_second, 60);
    assert_eq!(scheduler.seconds_until_next(0, 60), 60.0);

    // The next gap is converted at the new speed
    let record = scheduler.on_tick(3600).unwrap();
    assert_eq!(record.gap_ticks, 120 * 60);
    assert_eq!(record.variant, "clear_skies");
    assert_eq!(record.magnitude, 0.5);

    let changes: Vec<_> = scheduler
        .event_log()
        .events()
        .filter(|e| matches!(e, SchedulerEvent::TickRateChanged { .. }))
        .collect();
    assert_eq!(changes.len(), 1);
}

#[test]
fn test_seconds_until_next_saturates_at_zero() {
    let scheduler = scripted_scheduler(&[unit_for(120.0, 60.0, 900.0)], &[]);
    assert_eq!(scheduler.seconds_until_next(3600, 30), 0.0);
    assert_eq!(scheduler.seconds_until_next(99_999, 30), 0.0);
    assert_eq!(scheduler.seconds_until_next(1800, 30), 60.0);
}

// ============================================================================
// Event log
// ============================================================================

#[test]
fn test_event_log_records_lifecycle() {
    let mut scheduler = WeatherScheduler::new(SchedulerConfig::with_seed(12), 0).unwrap();
    let due = scheduler.state().next_trigger_tick;
    let record = scheduler.on_tick(due).unwrap();

    let events: Vec<_> = scheduler.event_log().events().collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type(), "Initialized");
    assert_eq!(
        *events[1],
        SchedulerEvent::Triggered {
            tick: due,
            variant: record.variant.clone(),
            magnitude: record.magnitude,
            next_trigger_tick: record.next_trigger_tick,
            trigger_count: 1,
        }
    );
}
