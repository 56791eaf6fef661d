//! Canonical entities and the entity-set document.

use serde::Serialize;

use super::attribute::Attribute;
use super::geometry::Geometry;

/// Upper bound of the "all time" range: `2^48 - 1`.
pub const SENTINEL_MAX: i64 = (1 << 48) - 1;

/// Lower bound of the "all time" range: `-(2^48 - 1)`.
pub const SENTINEL_MIN: i64 = -SENTINEL_MAX;

/// A canonical record ready for ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalEntity {
    /// Never empty.
    pub identity: String,
    pub kind: String,
    pub timestamp_ms: i64,
    pub endtime_ms: i64,
    #[serde(rename = "path")]
    pub geometry: Geometry,
    pub attrs: Vec<Attribute>,
}

/// The `{"entities": [...]}` document handed to the ingest transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntitySet {
    pub entities: Vec<CanonicalEntity>,
}

impl EntitySet {
    pub fn new(entities: Vec<CanonicalEntity>) -> Self {
        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Serialize to the compact wire document.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Split into single-entity sets, preserving order.
    pub fn into_singletons(self) -> impl Iterator<Item = EntitySet> {
        self.entities
            .into_iter()
            .map(|entity| EntitySet::new(vec![entity]))
    }
}
