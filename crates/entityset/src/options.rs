//! Caller options shared by the role mapper and the entity builder.

use chrono_tz::Tz;

use crate::error::Result;
use crate::inference::parse_timezone;

/// Options for one normalization run.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Use this kind for every entity instead of any inferred kind column.
    pub kind: Option<String>,
    /// Ignore identity inference and generate a fresh identity per record.
    pub generate_ids: bool,
    /// Skip the interactive confirmation of the role mapping.
    pub auto_confirm: bool,
    /// Force every entity onto the full sentinel time range.
    pub infinite: bool,
    /// Zone for calendar date strings (None = UTC / embedded offset).
    pub timezone: Option<Tz>,
}

impl IngestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn generate_ids(mut self, generate_ids: bool) -> Self {
        self.generate_ids = generate_ids;
        self
    }

    pub fn auto_confirm(mut self, auto_confirm: bool) -> Self {
        self.auto_confirm = auto_confirm;
        self
    }

    pub fn infinite(mut self, infinite: bool) -> Self {
        self.infinite = infinite;
        self
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = Some(tz);
        self
    }

    /// Set the timezone from an IANA name such as `Europe/Lisbon`.
    pub fn with_timezone_name(self, name: &str) -> Result<Self> {
        Ok(self.with_timezone(parse_timezone(name)?))
    }
}
