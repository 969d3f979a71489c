#![deny(missing_docs)]

//! # Reference Resolution
//!
//! Helper functions to resolve `$ref` strings against `components/schemas`.
//!
//! Only the trailing segment of a reference is meaningful. Multi-hop and
//! external-document references are not followed.

use crate::oas::document::{Components, SchemaNode};
use percent_encoding::percent_decode_str;

/// Extracts the simple name from a reference string.
/// e.g. `#/components/schemas/User` -> `User`
pub fn ref_name(reference: &str) -> String {
    let segment = reference.rsplit('/').next().unwrap_or(reference);
    decode_pointer_segment(segment)
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent encoding).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Resolves a schema name to its definition.
///
/// A missing name is not an error here; callers decide whether a dangling
/// reference is fatal.
pub fn lookup<'a>(name: &str, components: &'a Components) -> Option<&'a SchemaNode> {
    components.schemas.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::document::SchemaKind;

    #[test]
    fn test_ref_name() {
        assert_eq!(ref_name("#/components/schemas/User"), "User");
        assert_eq!(ref_name("User"), "User");
        assert_eq!(ref_name("#/definitions/Pet"), "Pet");
        assert_eq!(ref_name("#/components/schemas/"), "");
    }

    #[test]
    fn test_decode_pointer_segment() {
        assert_eq!(
            decode_pointer_segment("User%20Profile~1details"),
            "User Profile/details"
        );
        assert_eq!(decode_pointer_segment("a~0b"), "a~b");
    }

    #[test]
    fn test_lookup_single_hop() {
        let mut components = Components::default();
        components.schemas.insert(
            "User".into(),
            SchemaNode {
                kind: Some(SchemaKind::Object),
                ..Default::default()
            },
        );
        components.schemas.insert(
            "Alias".into(),
            SchemaNode {
                reference: Some("#/components/schemas/User".into()),
                ..Default::default()
            },
        );

        let user = lookup(&ref_name("#/components/schemas/User"), &components).unwrap();
        assert_eq!(user.kind, Some(SchemaKind::Object));

        // Only one hop: the alias node itself, not its target.
        let alias = lookup("Alias", &components).unwrap();
        assert!(alias.reference.is_some());

        assert!(lookup("Missing", &components).is_none());
    }
}
