//! Strict mode: validate pre-typed records carrying explicit id/kind/time/geometry.
//!
//! Nothing is inferred here. Each record must name its identity and kind,
//! and exactly one of `point`, `path` or `polygon`. Points are objects with
//! either `x`/`y` or `lat`/`lon` keys; `z` is always 0.

use std::collections::HashSet;

use chrono_tz::Tz;
use serde_json::Value;

use super::attributes_from;
use crate::entity::{
    Attribute, AttributeValue, CanonicalEntity, EntitySet, Geometry, Point, SENTINEL_MAX,
    SENTINEL_MIN,
};
use crate::error::{IngestError, Result};
use crate::inference::{parse_calendar_ms, parse_float};
use crate::input::{value_text, RawRecord};

/// Fields consumed by strict mode; everything else becomes an attribute.
const RESERVED_FIELDS: &[&str] = &["id", "kind", "time", "point", "path", "polygon"];

/// Attribute that repeats the kind on every strict entity.
const KIND_ATTRIBUTE: &str = "_kind";

const GEOMETRY_FIELDS: &[&str] = &["point", "path", "polygon"];

/// Which kind of pre-typed input a batch holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrictVariant {
    /// Time-stamped observations; `time` is required.
    Samples,
    /// Timeless entities; `time` must be absent. They span the sentinel range.
    Entities,
}

/// Validate and convert a batch of pre-typed records, reading times as UTC.
pub fn build_strict(records: &[RawRecord], variant: StrictVariant) -> Result<EntitySet> {
    build_strict_with(records, variant, None)
}

/// Validate and convert a batch of pre-typed records.
///
/// Identities must be unique across the batch for both variants. Every
/// entity gets a trailing `_kind` attribute holding its kind.
pub fn build_strict_with(
    records: &[RawRecord],
    variant: StrictVariant,
    tz: Option<Tz>,
) -> Result<EntitySet> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut entities = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let identity = required_text(index, record, "id")?;
        let kind = required_text(index, record, "kind")?;
        if !seen.insert(identity.clone()) {
            return Err(IngestError::DuplicateIdentity { index, identity });
        }

        let (timestamp_ms, endtime_ms) = match variant {
            StrictVariant::Samples => {
                let time = sample_time(index, record, tz)?;
                (time, time)
            }
            StrictVariant::Entities => {
                if record.get("time").is_some_and(|t| !t.is_null()) {
                    return Err(IngestError::UnexpectedField {
                        index,
                        field: "time".to_string(),
                        message: "timeless entities must not set time".to_string(),
                    });
                }
                (SENTINEL_MIN, SENTINEL_MAX)
            }
        };

        let geometry = convert_geometry(index, record)?;
        let mut attrs = attributes_from(record, |key| {
            RESERVED_FIELDS.contains(&key) || key == KIND_ATTRIBUTE
        });
        attrs.push(Attribute::new(
            KIND_ATTRIBUTE,
            AttributeValue::Str {
                str_value: kind.clone(),
            },
        ));

        entities.push(CanonicalEntity {
            identity,
            kind,
            timestamp_ms,
            endtime_ms,
            geometry,
            attrs,
        });
    }

    tracing::debug!(entities = entities.len(), ?variant, "validated strict batch");
    Ok(EntitySet::new(entities))
}

/// A present, non-null, non-empty field as text.
fn required_text(index: usize, record: &RawRecord, field: &str) -> Result<String> {
    let missing = || IngestError::MissingRequiredField {
        index,
        field: field.to_string(),
    };

    let value = record.get(field).filter(|v| !v.is_null()).ok_or_else(missing)?;
    let text = value_text(value);
    if text.is_empty() {
        return Err(missing());
    }
    Ok(text.into_owned())
}

fn sample_time(index: usize, record: &RawRecord, tz: Option<Tz>) -> Result<i64> {
    let value = record
        .get("time")
        .filter(|v| !v.is_null())
        .ok_or_else(|| IngestError::MissingRequiredField {
            index,
            field: "time".to_string(),
        })?;

    let malformed = || IngestError::MalformedTimestamp {
        index,
        field: "time".to_string(),
        value: value_text(value).into_owned(),
    };

    match value {
        Value::String(s) => parse_calendar_ms(s, tz).ok_or_else(malformed),
        _ => Err(malformed()),
    }
}

fn convert_geometry(index: usize, record: &RawRecord) -> Result<Geometry> {
    let invalid = |message: String| IngestError::InvalidGeometry { index, message };

    let present: Vec<(&str, &Value)> = GEOMETRY_FIELDS
        .iter()
        .filter_map(|field| {
            record
                .get(*field)
                .filter(|v| !v.is_null())
                .map(|v| (*field, v))
        })
        .collect();

    let (field, value) = match present.as_slice() {
        [] => {
            return Err(invalid(
                "a location (point, path, or polygon) is required".to_string(),
            ));
        }
        [single] => *single,
        _ => {
            return Err(invalid(
                "only one of point, path or polygon may be set".to_string(),
            ));
        }
    };

    match field {
        "point" => Ok(Geometry::Point(convert_point(index, value)?)),
        "path" => {
            let points = convert_points(index, field, value)?;
            if points.len() < 2 {
                return Err(invalid(format!(
                    "paths need at least two points, got {}",
                    points.len()
                )));
            }
            Ok(Geometry::Path(points))
        }
        _ => {
            let points = convert_points(index, field, value)?;
            if points.len() < 3 {
                return Err(invalid(format!(
                    "polygons need at least three points, got {}",
                    points.len()
                )));
            }
            Ok(Geometry::Polygon(points))
        }
    }
}

fn convert_points(index: usize, field: &str, value: &Value) -> Result<Vec<Point>> {
    let Value::Array(items) = value else {
        return Err(IngestError::InvalidGeometry {
            index,
            message: format!("{} must be a list of points", field),
        });
    };

    items.iter().map(|item| convert_point(index, item)).collect()
}

/// Convert `{x, y}` or `{lat, lon}` (exactly two keys) to a point.
fn convert_point(index: usize, value: &Value) -> Result<Point> {
    let invalid = |message: String| IngestError::InvalidGeometry { index, message };

    let Value::Object(map) = value else {
        return Err(invalid(format!("point must be an object, got {}", value)));
    };

    if map.len() != 2 {
        return Err(invalid(format!(
            "a point has exactly two dimensions, got {}",
            value
        )));
    }

    let (x, y) = if map.contains_key("x") && map.contains_key("y") {
        (&map["x"], &map["y"])
    } else if map.contains_key("lat") && map.contains_key("lon") {
        (&map["lon"], &map["lat"])
    } else {
        return Err(invalid(format!(
            "a point uses either x/y or lat/lon keys, got {}",
            value
        )));
    };

    let coordinate = |v: &Value| {
        parse_float(&value_text(v))
            .filter(|f| f.is_finite())
            .ok_or_else(|| invalid(format!("coordinate {} is not a number", v)))
    };

    Ok(Point::new(coordinate(x)?, coordinate(y)?, 0.0))
}
