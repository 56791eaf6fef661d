//! Role inference: value coercion, timestamp parsing, field scoring and role mapping.

mod coerce;
mod mapping;
mod scoring;
mod timestamp;

pub use coerce::{coerce, is_integral, parse_float};
pub use mapping::{map_roles, resolve_roles, AutoConfirm, ConfirmMapping, RoleAssignment, RoleSlot};
pub use scoring::{score, score_record, ScoreTable};
pub use timestamp::{parse_calendar_ms, parse_timestamp_ms, parse_timezone};
