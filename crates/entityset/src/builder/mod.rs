//! Entity building, for inferred role mappings and for pre-typed records.

mod identity;
mod inferred;
mod strict;

pub use identity::{IdentityGenerator, UuidGenerator};
pub use inferred::{build, EntityBuilder, DEFAULT_KIND};
pub use strict::{build_strict, build_strict_with, StrictVariant};

use crate::entity::Attribute;
use crate::inference::coerce;
use crate::input::{value_text, RawRecord};

/// Turn every column of `record` not rejected by `claimed` into an attribute,
/// in column order.
fn attributes_from(record: &RawRecord, claimed: impl Fn(&str) -> bool) -> Vec<Attribute> {
    record
        .iter()
        .filter(|(key, _)| !claimed(key.as_str()))
        .map(|(key, value)| Attribute::new(key.clone(), coerce(&value_text(value))))
        .collect()
}
