#![deny(missing_docs)]

//! # Schema Combination
//!
//! Flattens several schemas (an `allOf` list, or the targets of a redundant `$ref`)
//! into one synthetic object schema.

use crate::oas::document::{SchemaKind, SchemaNode};

/// Merges `schemas` left to right into a synthetic object schema.
///
/// - `required` is the concatenation of every input's list, in input order, not deduplicated.
/// - `properties` is an overlay: a later definition of a name replaces the earlier one
///   while keeping the earlier position.
///
/// Descriptions, enums and references of the inputs are not carried over.
pub fn combine<'a, I>(schemas: I) -> SchemaNode
where
    I: IntoIterator<Item = &'a SchemaNode>,
{
    let mut combined = SchemaNode {
        kind: Some(SchemaKind::Object),
        ..Default::default()
    };

    for schema in schemas {
        combined.required.extend(schema.required.iter().cloned());
        for (name, property) in &schema.properties {
            combined.properties.insert(name.clone(), property.clone());
        }
    }

    combined
}
