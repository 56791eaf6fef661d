//! Typed key/value attributes carried by an entity.

use serde::{Deserialize, Serialize};

/// A typed attribute value.
///
/// Serialized with a `type` tag and a type-specific value key, e.g.
/// `{"type": "INT64", "int64_value": 7}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AttributeValue {
    #[serde(rename = "INT64")]
    Int64 { int64_value: i64 },
    #[serde(rename = "DOUBLE")]
    Double { double_value: f64 },
    #[serde(rename = "STRING")]
    Str { str_value: String },
}

impl AttributeValue {
    /// Wire name of the value type.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Int64 { .. } => "INT64",
            AttributeValue::Double { .. } => "DOUBLE",
            AttributeValue::Str { .. } => "STRING",
        }
    }
}

/// A typed key/value pair on an entity not used for structural addressing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    #[serde(flatten)]
    pub value: AttributeValue,
}

impl Attribute {
    /// Create an attribute from a key and an already-typed value.
    pub fn new(key: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}
