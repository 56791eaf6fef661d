//! Raw records as read from CSV or JSON input.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde_json::Value;

/// Ordered mapping of column name to raw value.
///
/// Insertion order is the source column order and decides scoring ties.
/// CSV cells are always `Value::String`; JSON input keeps its own types.
pub type RawRecord = IndexMap<String, Value>;

/// The textual form of a raw value, as seen by the scorer and coercer.
///
/// Strings are returned verbatim, `null` becomes the empty string and
/// arrays/objects are rendered as compact JSON.
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Value::Number(n) => Cow::Owned(n.to_string()),
        other => Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("abc")), "abc");
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!(1.5)), "1.5");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&Value::Null), "");
        assert_eq!(value_text(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
