//! Property-based tests for the inference engine.
//!
//! Property-based tests verify:
//! 1. **No panics**: scoring and coercion accept any input
//! 2. **Round-trips**: integers survive coercion and serialization
//! 3. **Determinism**: identical batches give identical documents
//!
//! # Running Property Tests
//!
//! ```bash
//! PROPTEST_CASES=10000 cargo test -p entityset --test property_tests
//! ```

use proptest::prelude::*;
use serde_json::Value;

use entityset::inference::{coerce, parse_timestamp_ms, score};
use entityset::{AttributeValue, FieldRole, IngestOptions, Normalizer, RawRecord};

// =============================================================================
// Test Strategies
// =============================================================================

fn any_role() -> impl Strategy<Value = FieldRole> {
    prop::sample::select(FieldRole::ALL.to_vec())
}

/// Column names that look like real headers, plus noise.
fn column_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("id".to_string()),
        Just("ts".to_string()),
        Just("Latitude".to_string()),
        Just("end_time".to_string()),
        "[a-zA-Z_ ]{0,20}",
        "\\PC{0,30}",
    ]
}

/// Records with unique identities and numeric coordinates.
fn batch() -> impl Strategy<Value = Vec<RawRecord>> {
    prop::collection::vec(
        (-180.0f64..180.0, -90.0f64..90.0, 0i64..2_000_000_000_000, "[a-z]{1,8}"),
        1..20,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (lon, lat, ts, note))| {
                let mut record = RawRecord::new();
                record.insert("id".to_string(), Value::String(format!("e{}", i)));
                record.insert("lat".to_string(), Value::String(lat.to_string()));
                record.insert("lon".to_string(), Value::String(lon.to_string()));
                record.insert("ts".to_string(), Value::String(ts.to_string()));
                record.insert("note".to_string(), Value::String(note));
                record
            })
            .collect()
    })
}

// =============================================================================
// Value Coercer
// =============================================================================

proptest! {
    #[test]
    fn integers_coerce_to_int64(n in any::<i64>()) {
        let value = coerce(&n.to_string());
        prop_assert_eq!(&value, &AttributeValue::Int64 { int64_value: n });

        let json = serde_json::to_value(&value).unwrap();
        prop_assert_eq!(json["int64_value"].as_i64(), Some(n));
    }

    #[test]
    fn words_stay_strings(s in "[a-zA-Z_ ]{0,30}") {
        prop_assert_eq!(coerce(&s), AttributeValue::Str { str_value: s.clone() });
    }

    #[test]
    fn coercion_never_panics(s in "\\PC*") {
        let value = coerce(&s);
        if let AttributeValue::Str { str_value } = value {
            prop_assert_eq!(str_value, s);
        }
    }

    #[test]
    fn finite_floats_never_become_strings(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let value = coerce(&f.to_string());
        let is_numeric = matches!(
            value,
            AttributeValue::Int64 { .. } | AttributeValue::Double { .. }
        );
        prop_assert!(is_numeric);
    }
}

// =============================================================================
// Field Scorer and timestamps
// =============================================================================

proptest! {
    #[test]
    fn scoring_never_panics(column in column_name(), sample in "\\PC{0,40}", role in any_role()) {
        let first = score(&column, &sample, role);
        prop_assert_eq!(first, score(&column, &sample, role));
    }

    #[test]
    fn epoch_millis_parse_exactly(ms in any::<i64>()) {
        prop_assert_eq!(parse_timestamp_ms(&ms.to_string(), None), Some(ms));
    }

    #[test]
    fn failed_gate_zeroes_coordinates(sample in "[g-wG-W]{1,10}") {
        prop_assert_eq!(score("lat", &sample, FieldRole::Y), 0);
        prop_assert_eq!(score("longitude", &sample, FieldRole::X), 0);
    }
}

// =============================================================================
// Whole batches
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn identities_pass_through_verbatim(records in batch()) {
        let normalizer = Normalizer::new(IngestOptions::new().auto_confirm(true));
        let set = normalizer.normalize_records(&records).unwrap();

        prop_assert_eq!(set.len(), records.len());
        for (entity, record) in set.entities.iter().zip(&records) {
            prop_assert_eq!(Some(&Value::String(entity.identity.clone())), record.get("id"));
        }
    }

    #[test]
    fn normalization_is_deterministic(records in batch()) {
        let normalizer = Normalizer::new(IngestOptions::new().auto_confirm(true));
        let first = normalizer.normalize_records(&records).unwrap().to_json().unwrap();
        let second = normalizer.normalize_records(&records).unwrap().to_json().unwrap();
        prop_assert_eq!(first, second);
    }
}
