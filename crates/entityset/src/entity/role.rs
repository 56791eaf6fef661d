//! Structural roles a raw column can play.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The structural meaning assigned to one raw input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldRole {
    #[serde(rename = "identity")]
    Identity,
    #[serde(rename = "kind")]
    Kind,
    #[serde(rename = "timestamp_ms")]
    Timestamp,
    #[serde(rename = "endtime_ms")]
    Endtime,
    #[serde(rename = "x")]
    X,
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "z")]
    Z,
}

impl FieldRole {
    /// Every role, in the fixed order scoring and mapping iterate them.
    pub const ALL: [FieldRole; 7] = [
        FieldRole::Identity,
        FieldRole::Kind,
        FieldRole::Timestamp,
        FieldRole::Endtime,
        FieldRole::X,
        FieldRole::Y,
        FieldRole::Z,
    ];

    /// Name of the entity field this role fills.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldRole::Identity => "identity",
            FieldRole::Kind => "kind",
            FieldRole::Timestamp => "timestamp_ms",
            FieldRole::Endtime => "endtime_ms",
            FieldRole::X => "x",
            FieldRole::Y => "y",
            FieldRole::Z => "z",
        }
    }

    /// Returns true for the two time roles.
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldRole::Timestamp | FieldRole::Endtime)
    }

    /// Returns true for the three coordinate roles.
    pub fn is_coordinate(&self) -> bool {
        matches!(self, FieldRole::X | FieldRole::Y | FieldRole::Z)
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_names_match_entity_fields() {
        for role in FieldRole::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_role_groups() {
        assert!(FieldRole::Timestamp.is_temporal());
        assert!(FieldRole::Endtime.is_temporal());
        assert!(!FieldRole::Kind.is_temporal());
        assert!(FieldRole::Z.is_coordinate());
        assert!(!FieldRole::Identity.is_coordinate());
    }
}
