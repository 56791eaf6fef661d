//! Identity generation for records without a usable identity.

use uuid::Uuid;

/// Source of fresh entity identities.
pub trait IdentityGenerator {
    fn next_identity(&self) -> String;
}

/// Random (v4) UUIDs in hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdentityGenerator for UuidGenerator {
    fn next_identity(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_generator() {
        let generator = UuidGenerator;
        let a = generator.next_identity();
        let b = generator.next_identity();

        assert!(Uuid::parse_str(&a).is_ok());
        assert_eq!(a.len(), 36);
        assert_ne!(a, b);
    }
}
