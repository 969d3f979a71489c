#![deny(missing_docs)]

//! # Type Expansion
//!
//! The expansion rule shared by model properties and endpoint parameters, bodies
//! and responses:
//!
//! - `type` present: delegate to the scalar mapper; a `string` enum owned by a
//!   known schema property becomes a nested enum named `<Schema><Property>`.
//! - only `$ref` present: the referenced schema name.
//! - neither: unresolved; the caller decides whether that is fatal.

use crate::error::{AppError, AppResult};
use crate::oas::descriptions::parse_enum_description;
use crate::oas::document::{PropertyNode, ScalarType};
use crate::oas::models::{EnumCase, EnumModel, MISSING_DESCRIPTION};
use crate::oas::naming::nested_enum_name;
use crate::oas::refs::ref_name;
use crate::type_mapping::{map_scalar, TypeRef, TypeVocabulary};

/// The schema property owning a descriptor, used to name nested enums.
#[derive(Debug, Clone, Copy)]
pub struct EnumOwner<'a> {
    /// Owning schema name.
    pub schema: &'a str,
    /// Property name.
    pub property: &'a str,
}

/// Result of expanding a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    /// The resolved type.
    pub ty: TypeRef,
    /// The nested enum to emit alongside the owning model, if any.
    pub nested_enum: Option<EnumModel>,
}

/// Expands a descriptor into a type.
///
/// # Arguments
///
/// * `node` - The property, parameter, body or response descriptor.
/// * `owner` - The owning schema property; `None` outside of models, in which case
///   string enums collapse to plain text.
/// * `vocabulary` - Spelling of the enum's raw type.
///
/// # Errors
///
/// `AppError::UnsupportedType` if the descriptor cannot be typed.
pub fn expand_type(
    node: &PropertyNode,
    owner: Option<EnumOwner<'_>>,
    vocabulary: &TypeVocabulary,
) -> AppResult<Expansion> {
    if let Some(scalar) = &node.scalar_type {
        if let (ScalarType::String, Some(values), Some(owner)) = (scalar, &node.enum_values, owner)
        {
            if node.format.as_deref() != Some("binary") {
                let nested = nested_enum(node, values, owner, vocabulary);
                return Ok(Expansion {
                    ty: TypeRef::Enum(nested.name.clone()),
                    nested_enum: Some(nested),
                });
            }
        }

        return Ok(Expansion {
            ty: map_scalar(node)?,
            nested_enum: None,
        });
    }

    match &node.reference {
        Some(reference) => Ok(Expansion {
            ty: TypeRef::Named(ref_name(reference)),
            nested_enum: None,
        }),
        None => Err(AppError::UnsupportedType {
            ty: "<none>".into(),
            reason: "has neither `type` nor `$ref`".into(),
        }),
    }
}

fn nested_enum(
    node: &PropertyNode,
    values: &[String],
    owner: EnumOwner<'_>,
    vocabulary: &TypeVocabulary,
) -> EnumModel {
    let docs = parse_enum_description(node.description.as_deref());
    let cases = values
        .iter()
        .map(|value| EnumCase {
            name: value.clone(),
            description: docs
                .cases
                .get(value)
                .cloned()
                .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
        })
        .collect();

    EnumModel {
        name: nested_enum_name(owner.schema, owner.property),
        description: docs
            .shared
            .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
        raw_type: vocabulary.text.clone(),
        cases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_mapping::Primitive;

    fn parse(yaml: &str) -> PropertyNode {
        serde_yaml::from_str(yaml).unwrap()
    }

    const OWNER: EnumOwner<'static> = EnumOwner {
        schema: "order",
        property: "status",
    };

    #[test]
    fn test_scalar_and_ref() {
        let vocab = TypeVocabulary::default();
        let int = expand_type(&parse("{type: integer, format: int32}"), None, &vocab).unwrap();
        assert_eq!(int.ty, TypeRef::Primitive(Primitive::Int32));
        assert!(int.nested_enum.is_none());

        let node = parse("{$ref: '#/components/schemas/Pet'}");
        let named = expand_type(&node, None, &vocab).unwrap();
        assert_eq!(named.ty, TypeRef::Named("Pet".into()));
    }

    #[test]
    fn test_type_wins_over_ref() {
        let vocab = TypeVocabulary::default();
        let node = parse("{type: boolean, $ref: '#/components/schemas/Pet'}");
        let res = expand_type(&node, None, &vocab).unwrap();
        assert_eq!(res.ty, TypeRef::Primitive(Primitive::Bool));
    }

    #[test]
    fn test_unresolved() {
        let vocab = TypeVocabulary::default();
        let err = expand_type(&parse("{description: nothing}"), None, &vocab).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedType { .. }));
    }

    #[test]
    fn test_string_enum_with_owner() {
        let vocab = TypeVocabulary::default();
        let node = parse(
            r#"
type: string
enum: [placed, delivered]
description: "Order status|\n- xxplaced - Waiting\n- xxunknown - Ignored"
"#,
        );
        let res = expand_type(&node, Some(OWNER), &vocab).unwrap();
        assert_eq!(res.ty, TypeRef::Enum("OrderStatus".into()));

        let nested = res.nested_enum.unwrap();
        assert_eq!(nested.name, "OrderStatus");
        assert_eq!(nested.description, "Order status");
        assert_eq!(nested.raw_type, "String");
        assert_eq!(
            nested.cases,
            vec![
                EnumCase {
                    name: "placed".into(),
                    description: "Waiting".into()
                },
                EnumCase {
                    name: "delivered".into(),
                    description: MISSING_DESCRIPTION.into()
                },
            ]
        );
    }

    #[test]
    fn test_string_enum_without_owner_is_text() {
        let vocab = TypeVocabulary::default();
        let node = parse("{type: string, enum: [a, b]}");
        let res = expand_type(&node, None, &vocab).unwrap();
        assert_eq!(res.ty, TypeRef::Primitive(Primitive::Text));
        assert!(res.nested_enum.is_none());
    }

    #[test]
    fn test_binary_enum_stays_binary() {
        let vocab = TypeVocabulary::default();
        let node = parse("{type: string, format: binary, enum: [a]}");
        let res = expand_type(&node, Some(OWNER), &vocab).unwrap();
        assert_eq!(res.ty, TypeRef::Primitive(Primitive::Binary));
    }
}
