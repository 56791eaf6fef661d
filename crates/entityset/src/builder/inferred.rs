//! Inferred mode: apply a role assignment to every record of a batch.

use serde_json::Value;

use super::attributes_from;
use super::identity::{IdentityGenerator, UuidGenerator};
use crate::entity::{
    CanonicalEntity, EntitySet, FieldRole, Geometry, Point, SENTINEL_MAX, SENTINEL_MIN,
};
use crate::error::{IngestError, Result};
use crate::inference::{parse_float, parse_timestamp_ms, RoleAssignment};
use crate::input::{value_text, RawRecord};
use crate::options::IngestOptions;

static UUIDS: UuidGenerator = UuidGenerator;

/// Kind used when neither an override nor a kind column supplies one.
pub const DEFAULT_KIND: &str = "default";

/// Builds canonical entities from raw records and a resolved role assignment.
///
/// The same assignment is applied to every record; nothing is re-inferred
/// per record.
pub struct EntityBuilder<'a> {
    assignment: &'a RoleAssignment,
    options: &'a IngestOptions,
    ids: &'a dyn IdentityGenerator,
}

impl<'a> EntityBuilder<'a> {
    /// Create a builder that generates UUID identities where needed.
    pub fn new(assignment: &'a RoleAssignment, options: &'a IngestOptions) -> Self {
        Self {
            assignment,
            options,
            ids: &UUIDS,
        }
    }

    /// Use a different source for generated identities.
    pub fn with_identity_generator(mut self, ids: &'a dyn IdentityGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Build one entity per record. The first malformed timestamp aborts the batch.
    pub fn build(&self, records: &[RawRecord]) -> Result<EntitySet> {
        let entities = records
            .iter()
            .enumerate()
            .map(|(index, record)| self.build_entity(index, record))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(entities = entities.len(), "built entity set");
        Ok(EntitySet::new(entities))
    }

    fn build_entity(&self, index: usize, record: &RawRecord) -> Result<CanonicalEntity> {
        let (timestamp_ms, endtime_ms) = self.resolve_times(index, record)?;
        let claimed = self.assignment.claimed_columns();

        Ok(CanonicalEntity {
            identity: self.resolve_identity(record),
            kind: self.resolve_kind(record),
            timestamp_ms,
            endtime_ms,
            geometry: Geometry::Point(Point::new(
                self.resolve_coordinate(record, FieldRole::X),
                self.resolve_coordinate(record, FieldRole::Y),
                self.resolve_coordinate(record, FieldRole::Z),
            )),
            attrs: attributes_from(record, |key| claimed.contains(key)),
        })
    }

    /// Raw value of the column mapped to `role`, if mapped and present.
    fn raw<'r>(&self, record: &'r RawRecord, role: FieldRole) -> Option<&'r Value> {
        self.assignment
            .column(role)
            .and_then(|column| record.get(column))
    }

    fn resolve_identity(&self, record: &RawRecord) -> String {
        match self.raw(record, FieldRole::Identity) {
            Some(value) => {
                let text = value_text(value);
                if text.trim().is_empty() {
                    self.ids.next_identity()
                } else {
                    text.into_owned()
                }
            }
            None => self.ids.next_identity(),
        }
    }

    fn resolve_kind(&self, record: &RawRecord) -> String {
        if let Some(kind) = &self.assignment.slot(FieldRole::Kind).override_value {
            return kind.clone();
        }
        match self.raw(record, FieldRole::Kind).map(value_text) {
            Some(text) if !text.is_empty() => text.into_owned(),
            _ => DEFAULT_KIND.to_string(),
        }
    }

    fn resolve_times(&self, index: usize, record: &RawRecord) -> Result<(i64, i64)> {
        if self.options.infinite {
            return Ok((SENTINEL_MIN, SENTINEL_MAX));
        }

        let timestamp = self
            .resolve_time(index, record, FieldRole::Timestamp)?
            .unwrap_or(SENTINEL_MIN);

        // No end column: the entity is instantaneous
        let endtime = if self.assignment.column(FieldRole::Endtime).is_none() {
            timestamp
        } else {
            self.resolve_time(index, record, FieldRole::Endtime)?
                .unwrap_or(SENTINEL_MAX)
        };

        Ok((timestamp, endtime))
    }

    fn resolve_time(&self, index: usize, record: &RawRecord, role: FieldRole) -> Result<Option<i64>> {
        let Some(value) = self.raw(record, role) else {
            return Ok(None);
        };

        let text = value_text(value);
        parse_timestamp_ms(&text, self.options.timezone)
            .map(Some)
            .ok_or_else(|| IngestError::MalformedTimestamp {
                index,
                field: self.assignment.column(role).unwrap_or_default().to_string(),
                value: text.into_owned(),
            })
    }

    fn resolve_coordinate(&self, record: &RawRecord, role: FieldRole) -> f64 {
        self.raw(record, role)
            .and_then(|value| parse_float(&value_text(value)))
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

/// Build an entity set from records and a resolved assignment.
pub fn build(
    records: &[RawRecord],
    assignment: &RoleAssignment,
    options: &IngestOptions,
) -> Result<EntitySet> {
    EntityBuilder::new(assignment, options).build(records)
}
