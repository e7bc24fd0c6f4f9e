//! Fixed catalog of event variants
//!
//! The catalog is an ordered list of variant identifiers. Order matters: the
//! scheduler selects by index, so two peers with the same entries in a
//! different order would diverge.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Neutral variant used before the first trigger
pub const CLEAR_SKIES: &str = "clear_skies";

/// Default weather catalog, in selection order
pub const DEFAULT_WEATHER_EVENTS: &[&str] = &[
    CLEAR_SKIES,
    "light_rain",
    "heavy_rain",
    "thunderstorm",
    "fog",
    "snowfall",
    "blizzard",
    "sandstorm",
    "heat_wave",
];

/// Errors raised while building a catalog
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog must contain at least one variant")]
    Empty,

    #[error("variant '{0}' appears more than once in the catalog")]
    DuplicateVariant(String),

    #[error("neutral variant '{0}' is not a member of the catalog")]
    NeutralNotInCatalog(String),

    #[error("variant identifiers must not be empty")]
    BlankVariant,
}

/// Identifier of one catalog member (e.g. `"heavy_rain"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(String);

impl VariantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq<str> for VariantId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for VariantId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Ordered, non-empty, duplicate-free set of variants with a designated
/// neutral member
///
/// # Example
/// ```
/// use weather_scheduler_core_rs::Catalog;
///
/// let catalog = Catalog::weather();
/// assert_eq!(catalog.neutral(), "clear_skies");
/// assert!(catalog.contains("heavy_rain"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    variants: Vec<VariantId>,
    neutral: VariantId,
}

impl Catalog {
    /// Build a catalog, rejecting empty, duplicated or neutral-less inputs
    pub fn new<I, S>(variants: I, neutral: impl Into<String>) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let variants: Vec<VariantId> = variants
            .into_iter()
            .map(VariantId::new)
            .collect();

        if variants.is_empty() {
            return Err(CatalogError::Empty);
        }
        if variants.iter().any(|v| v.as_str().is_empty()) {
            return Err(CatalogError::BlankVariant);
        }
        for (i, variant) in variants.iter().enumerate() {
            if variants[..i].contains(variant) {
                return Err(CatalogError::DuplicateVariant(variant.to_string()));
            }
        }

        let neutral = VariantId::new(neutral);
        if !variants.contains(&neutral) {
            return Err(CatalogError::NeutralNotInCatalog(neutral.to_string()));
        }

        Ok(Self { variants, neutral })
    }

    /// The built-in weather catalog with `clear_skies` as neutral
    pub fn weather() -> Self {
        Self {
            variants: DEFAULT_WEATHER_EVENTS.iter().map(|v| VariantId::from(*v)).collect(),
            neutral: VariantId::from(CLEAR_SKIES),
        }
    }

    pub fn variants(&self) -> &[VariantId] {
        &self.variants
    }

    pub fn neutral(&self) -> &VariantId {
        &self.neutral
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Always false for a constructed catalog
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.variants.iter().any(|v| v.as_str() == id)
    }

    /// Variant at selection index `index`
    pub fn get(&self, index: usize) -> Option<&VariantId> {
        self.variants.get(index)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::weather()
    }
}
