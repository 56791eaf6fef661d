//! Field scoring: per (column, role) affinity from a single sample record.
//!
//! Column-name heuristics are additive and case-insensitive. The time and
//! coordinate roles are gated on the sample value parsing; a failed gate
//! zeroes the score whatever the name says.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use super::coerce::{is_integral, parse_float};
use super::timestamp::parse_timestamp_ms;
use crate::entity::FieldRole;
use crate::input::{value_text, RawRecord};

/// MAC address, one separator used throughout.
static MAC_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9a-f]{2}(?::[0-9a-f]{2}){5}|[0-9a-f]{2}(?:-[0-9a-f]{2}){5})$")
        .expect("MAC address pattern is valid")
});

type ScoreFn = fn(&str, &str) -> u32;

/// One scoring function per role, in [`FieldRole::ALL`] order.
static SCORERS: [(FieldRole, ScoreFn); 7] = [
    (FieldRole::Identity, identity_score),
    (FieldRole::Kind, kind_score),
    (FieldRole::Timestamp, timestamp_score),
    (FieldRole::Endtime, endtime_score),
    (FieldRole::X, x_score),
    (FieldRole::Y, y_score),
    (FieldRole::Z, z_score),
];

/// Scores for every role and column, derived from one sample record.
///
/// Columns keep the sample's order within each role.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreTable {
    scores: IndexMap<FieldRole, IndexMap<String, u32>>,
}

impl ScoreTable {
    /// Score every column of `sample` for every role.
    pub fn from_sample(sample: &RawRecord) -> Self {
        let mut scores = IndexMap::new();
        for (role, scorer) in &SCORERS {
            let columns: IndexMap<String, u32> = sample
                .iter()
                .map(|(name, value)| (name.clone(), scorer(name, &value_text(value))))
                .collect();
            scores.insert(*role, columns);
        }
        Self { scores }
    }

    /// Scores for one role, in column order.
    pub fn role(&self, role: FieldRole) -> impl Iterator<Item = (&str, u32)> {
        self.scores
            .get(&role)
            .into_iter()
            .flat_map(|columns| columns.iter().map(|(name, score)| (name.as_str(), *score)))
    }

    /// Score of one column for one role (0 if the column is unknown).
    pub fn get(&self, role: FieldRole, column: &str) -> u32 {
        self.scores
            .get(&role)
            .and_then(|columns| columns.get(column))
            .copied()
            .unwrap_or(0)
    }

    /// Number of columns scored.
    pub fn column_count(&self) -> usize {
        self.scores.values().next().map(|c| c.len()).unwrap_or(0)
    }
}

/// Score every column of a sample record for every role.
pub fn score_record(sample: &RawRecord) -> ScoreTable {
    ScoreTable::from_sample(sample)
}

/// Score one column for one role.
pub fn score(column: &str, sample: &str, role: FieldRole) -> u32 {
    SCORERS
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, scorer)| scorer(column, sample))
        .unwrap_or(0)
}

fn identity_score(column: &str, value: &str) -> u32 {
    let key = column.to_lowercase();
    let mut score = 0;

    if key == "identity" || key == "id" {
        score += 1000;
    }
    if key.starts_with("id_") || key.starts_with("id ") {
        score += 100;
    }
    if key.ends_with(" id") || key.ends_with("_id") {
        score += 100;
    }
    if is_integral(value) {
        score += 100;
        if !value.contains('.') {
            score += 300;
        }
    }
    if Uuid::parse_str(value.trim()).is_ok() {
        score += 500;
    }
    if MAC_ADDRESS.is_match(&value.to_lowercase()) {
        score += 400;
    }

    score
}

fn kind_score(column: &str, _value: &str) -> u32 {
    match column.to_lowercase().as_str() {
        "kind" | "type" | "category" => 1000,
        _ => 0,
    }
}

fn timestamp_score(column: &str, value: &str) -> u32 {
    let key = column.to_lowercase();
    let mut score = 0;

    if key == "timestamp_ms" {
        score += 1000;
    }
    if key == "ts" {
        score += 1000;
    }
    if key.starts_with("timestamp") {
        score += 800;
    }
    if key.contains("time") {
        score += 500;
    }
    if key.starts_with("start") {
        score += 200;
    }

    time_gate(score, value)
}

fn endtime_score(column: &str, value: &str) -> u32 {
    let key = column.to_lowercase();
    let mut score = 0;

    if key == "endtime_ms" {
        score += 1000;
    }
    if key.starts_with("endtime") {
        score += 800;
    }
    if key.contains("time") && key.contains("end") {
        score += 500;
    }
    if key.starts_with("end") {
        score += 200;
    }

    time_gate(score, value)
}

fn x_score(column: &str, value: &str) -> u32 {
    let key = column.to_lowercase();
    let mut score = 0;

    if matches!(key.as_str(), "x" | "longitude" | "lon" | "lng") {
        score += 1000;
    }
    if key.contains("longitude") {
        score += 500;
    }

    float_gate(score, value)
}

fn y_score(column: &str, value: &str) -> u32 {
    let key = column.to_lowercase();
    let mut score = 0;

    if matches!(key.as_str(), "y" | "latitude" | "lat") {
        score += 1000;
    }
    if key.contains("latitude") {
        score += 500;
    }

    float_gate(score, value)
}

fn z_score(column: &str, value: &str) -> u32 {
    let key = column.to_lowercase();
    let mut score = 0;

    if matches!(key.as_str(), "z" | "height" | "depth" | "altitude") {
        score += 1000;
    }
    if key == "alt" {
        score += 100;
    }

    float_gate(score, value)
}

fn time_gate(score: u32, value: &str) -> u32 {
    if parse_timestamp_ms(value, None).is_some() {
        score
    } else {
        0
    }
}

fn float_gate(score: u32, value: &str) -> u32 {
    if parse_float(value).is_some() { score } else { 0 }
}
