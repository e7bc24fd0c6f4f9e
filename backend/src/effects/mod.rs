//! Effect consumer capability
//!
//! Gameplay systems (unit speed, vision, production) and cosmetic layers react
//! to weather without the scheduler knowing about them. Each registers an
//! [`EffectConsumer`] and is called with `(variant, magnitude)` after every
//! trigger, once the new state is already visible to readers.
//!
//! # Consumer Interface
//!
//! ```rust
//! use weather_scheduler_core_rs::effects::EffectConsumer;
//! use weather_scheduler_core_rs::VariantId;
//!
//! struct VisionModifier {
//!     range_multiplier: f64,
//! }
//!
//! impl EffectConsumer for VisionModifier {
//!     fn name(&self) -> &str {
//!         "vision"
//!     }
//!
//!     fn on_trigger(&mut self, variant: &VariantId, magnitude: f64) {
//!         self.range_multiplier = if variant == "fog" {
//!             1.0 - 0.5 * magnitude
//!         } else {
//!             1.0
//!         };
//!     }
//! }
//! ```
//!
//! Closures work too: any `FnMut(&VariantId, f64) + Send` is a consumer.

use crate::models::catalog::VariantId;
use tracing::debug;

/// Something that applies weather effects when a trigger happens
pub trait EffectConsumer: Send {
    /// Label used in diagnostics
    fn name(&self) -> &str {
        "anonymous"
    }

    fn on_trigger(&mut self, variant: &VariantId, magnitude: f64);
}

impl<F> EffectConsumer for F
where
    F: FnMut(&VariantId, f64) + Send,
{
    fn on_trigger(&mut self, variant: &VariantId, magnitude: f64) {
        self(variant, magnitude)
    }
}

/// Ordered set of registered consumers
#[derive(Default)]
pub struct EffectRegistry {
    consumers: Vec<Box<dyn EffectConsumer>>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, consumer: Box<dyn EffectConsumer>) {
        self.consumers.push(consumer);
    }

    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    /// Invoke every consumer in registration order
    pub fn dispatch(&mut self, variant: &VariantId, magnitude: f64) {
        for consumer in &mut self.consumers {
            debug!(consumer = consumer.name(), %variant, magnitude, "Dispatching weather effect");
            consumer.on_trigger(variant, magnitude);
        }
    }
}

impl std::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.consumers.iter().map(|c| c.name()))
            .finish()
    }
}
