//! Entityset: turn loosely structured tabular records into canonical spatiotemporal entities.
//!
//! Given a batch of CSV rows or JSON objects whose columns carry arbitrary
//! names, entityset guesses which column plays which role (identity, kind,
//! start/end time, x/y/z coordinates), asks for confirmation, and builds a
//! document of typed entities ready for ingestion.
//!
//! # Pipeline
//!
//! - **Field scoring**: every column of the first record is scored for every role
//! - **Role mapping**: the best column per role wins, subject to caller overrides
//! - **Entity building**: the mapping is applied to every record; the
//!   remaining columns become typed attributes
//!
//! Pre-typed records with explicit `id`/`kind`/`time` and geometry go
//! through [`build_strict`] instead, which validates rather than infers.
//!
//! # Example
//!
//! ```no_run
//! use entityset::{IngestOptions, Normalizer};
//!
//! let normalizer = Normalizer::new(IngestOptions::new().auto_confirm(true));
//! let (set, source) = normalizer.normalize_file("people.csv").unwrap();
//!
//! println!("{} records from {}", source.record_count, source.file);
//! println!("{}", set.to_json().unwrap());
//! ```

pub mod builder;
pub mod config;
pub mod entity;
pub mod error;
pub mod inference;
pub mod input;
pub mod transport;

mod normalizer;
mod options;

pub use builder::{build_strict, build_strict_with, EntityBuilder, IdentityGenerator, StrictVariant};
pub use entity::{
    Attribute, AttributeValue, CanonicalEntity, EntitySet, FieldRole, Geometry, Point,
    SENTINEL_MAX, SENTINEL_MIN,
};
pub use error::{IngestError, Result};
pub use inference::{AutoConfirm, ConfirmMapping, RoleAssignment, ScoreTable};
pub use input::{RawRecord, SourceMetadata};
pub use normalizer::Normalizer;
pub use options::IngestOptions;
