//! Canonical entity model.

mod attribute;
mod geometry;
mod role;
mod set;

pub use attribute::{Attribute, AttributeValue};
pub use geometry::{Geometry, Point};
pub use role::FieldRole;
pub use set::{CanonicalEntity, EntitySet, SENTINEL_MAX, SENTINEL_MIN};
