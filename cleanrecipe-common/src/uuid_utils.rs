//! Identity utilities
//!
//! Recipe identities are opaque strings; new ones are UUIDv4 rendered in
//! hyphenated form. Identities loaded from storage are never re-parsed, so
//! records written by older clients keep their original ids.

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Generate a fresh opaque recipe identity
pub fn new_recipe_id() -> String {
    generate().hyphenated().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_recipe_id_is_parseable_uuid() {
        let id = new_recipe_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(id.len(), 36);
    }

    #[test]
    fn test_new_recipe_ids_are_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| new_recipe_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
