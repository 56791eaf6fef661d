//! Role mapping: reduce a score table to one column (or none) per role.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use super::scoring::ScoreTable;
use crate::entity::FieldRole;
use crate::error::{IngestError, Result};
use crate::options::IngestOptions;

/// Resolution of a single role.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoleSlot {
    /// Column the role reads from, if any column scored above zero.
    pub column: Option<String>,
    /// Winning score (0 when unassigned).
    pub score: u32,
    /// Caller-supplied value that wins over the column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_value: Option<String>,
}

/// Role → column mapping for one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RoleAssignment {
    slots: IndexMap<FieldRole, RoleSlot>,
}

impl RoleAssignment {
    /// The resolution of `role`.
    pub fn slot(&self, role: FieldRole) -> &RoleSlot {
        static UNASSIGNED: RoleSlot = RoleSlot {
            column: None,
            score: 0,
            override_value: None,
        };
        self.slots.get(&role).unwrap_or(&UNASSIGNED)
    }

    /// Column mapped to `role`, if any.
    pub fn column(&self, role: FieldRole) -> Option<&str> {
        self.slot(role).column.as_deref()
    }

    /// Columns claimed by some role. Everything else becomes an attribute.
    pub fn claimed_columns(&self) -> HashSet<&str> {
        self.slots
            .values()
            .filter_map(|slot| slot.column.as_deref())
            .collect()
    }

    /// Iterate roles and their resolutions in role order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldRole, &RoleSlot)> {
        self.slots.iter().map(|(role, slot)| (*role, slot))
    }
}

/// Confirmation capability consulted before a mapping is used.
///
/// Returning `false` aborts the whole run.
pub trait ConfirmMapping {
    fn confirm(&self, assignment: &RoleAssignment) -> bool;
}

impl<F> ConfirmMapping for F
where
    F: Fn(&RoleAssignment) -> bool,
{
    fn confirm(&self, assignment: &RoleAssignment) -> bool {
        self(assignment)
    }
}

/// Accepts every mapping. For headless callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl ConfirmMapping for AutoConfirm {
    fn confirm(&self, _assignment: &RoleAssignment) -> bool {
        true
    }
}

/// Pick the best column per role and apply the caller overrides.
///
/// The strictly greatest score wins; ties keep the earliest column. A best
/// score of zero leaves the role unassigned.
pub fn resolve_roles(table: &ScoreTable, options: &IngestOptions) -> RoleAssignment {
    let mut slots = IndexMap::new();

    for role in FieldRole::ALL {
        let mut best = RoleSlot::default();
        for (column, score) in table.role(role) {
            if score > best.score {
                best.score = score;
                best.column = Some(column.to_string());
            }
        }

        match role {
            FieldRole::Identity if options.generate_ids => best = RoleSlot::default(),
            FieldRole::Kind => best.override_value = options.kind.clone(),
            _ => {}
        }

        tracing::debug!(
            role = %role,
            column = best.column.as_deref().unwrap_or("-"),
            score = best.score,
            "resolved role"
        );
        slots.insert(role, best);
    }

    RoleAssignment { slots }
}

/// Resolve the mapping and, unless `auto_confirm` is set, ask `confirm`.
pub fn map_roles(
    table: &ScoreTable,
    options: &IngestOptions,
    confirm: &dyn ConfirmMapping,
) -> Result<RoleAssignment> {
    let assignment = resolve_roles(table, options);

    if !options.auto_confirm && !confirm.confirm(&assignment) {
        return Err(IngestError::UserDeclinedMapping);
    }

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawRecord;
    use serde_json::Value;
    use std::cell::Cell;

    fn table(pairs: &[(&str, &str)]) -> ScoreTable {
        let sample: RawRecord = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        ScoreTable::from_sample(&sample)
    }

    fn scenario_table() -> ScoreTable {
        table(&[
            ("id", "42"),
            ("kind", "person"),
            ("lat", "41.2"),
            ("lon", "-8.6"),
            ("ts", "2020-01-01T00:00:00Z"),
        ])
    }

    #[test]
    fn test_resolves_each_role() {
        let assignment = resolve_roles(&scenario_table(), &IngestOptions::new());

        assert_eq!(assignment.column(FieldRole::Identity), Some("id"));
        assert_eq!(assignment.column(FieldRole::Kind), Some("kind"));
        assert_eq!(assignment.column(FieldRole::Timestamp), Some("ts"));
        assert_eq!(assignment.column(FieldRole::Endtime), None);
        assert_eq!(assignment.column(FieldRole::X), Some("lon"));
        assert_eq!(assignment.column(FieldRole::Y), Some("lat"));
        assert_eq!(assignment.column(FieldRole::Z), None);
        assert_eq!(assignment.slot(FieldRole::Identity).score, 1400);
    }

    #[test]
    fn test_ties_keep_first_column() {
        let assignment = resolve_roles(
            &table(&[("type", "a"), ("kind", "b"), ("category", "c")]),
            &IngestOptions::new(),
        );
        assert_eq!(assignment.column(FieldRole::Kind), Some("type"));
    }

    #[test]
    fn test_generate_ids_unassigns_identity() {
        let options = IngestOptions::new().generate_ids(true);
        let assignment = resolve_roles(&scenario_table(), &options);

        assert_eq!(assignment.column(FieldRole::Identity), None);
        assert_eq!(assignment.slot(FieldRole::Identity).score, 0);
        assert!(!assignment.claimed_columns().contains("id"));
    }

    #[test]
    fn test_kind_override_keeps_column_claimed() {
        let options = IngestOptions::new().with_kind("vehicle");
        let assignment = resolve_roles(&scenario_table(), &options);

        let kind = assignment.slot(FieldRole::Kind);
        assert_eq!(kind.override_value.as_deref(), Some("vehicle"));
        assert!(assignment.claimed_columns().contains("kind"));
    }

    #[test]
    fn test_claimed_columns() {
        let assignment = resolve_roles(
            &table(&[("id", "1"), ("name", "alpha"), ("x", "1.0")]),
            &IngestOptions::new(),
        );
        let claimed = assignment.claimed_columns();
        assert!(claimed.contains("id"));
        assert!(claimed.contains("x"));
        assert!(!claimed.contains("name"));
    }

    #[test]
    fn test_confirmer_is_asked_and_can_decline() {
        let asked = Cell::new(0);
        let decline = |_: &RoleAssignment| {
            asked.set(asked.get() + 1);
            false
        };

        let result = map_roles(&scenario_table(), &IngestOptions::new(), &decline);
        assert!(matches!(result, Err(IngestError::UserDeclinedMapping)));
        assert_eq!(asked.get(), 1);
    }

    #[test]
    fn test_auto_confirm_skips_confirmer() {
        let never = |_: &RoleAssignment| -> bool { panic!("confirmer must not be called") };
        let options = IngestOptions::new().auto_confirm(true);

        let assignment = map_roles(&scenario_table(), &options, &never).unwrap();
        assert_eq!(assignment.column(FieldRole::Identity), Some("id"));
    }

    #[test]
    fn test_serializes_for_display() {
        let options = IngestOptions::new().with_kind("vehicle");
        let assignment = resolve_roles(&scenario_table(), &options);
        let json = serde_json::to_value(&assignment).unwrap();

        assert_eq!(json["identity"]["column"], "id");
        assert_eq!(json["identity"]["score"], 1400);
        assert_eq!(json["kind"]["override_value"], "vehicle");
        assert!(json["z"]["column"].is_null());
    }
}
