#![deny(missing_docs)]

//! # Schema Expansion
//!
//! Turns `components/schemas` into model IR.
//!
//! Defines logic to:
//! - Flatten pure `$ref` aliases and `allOf` compositions into one object schema.
//! - Emit object models with typed, sorted properties and their nested enums.
//! - Emit enum models for top-level `string` schemas.
//! - Check that every generated enum name is unique.

use crate::error::{AppError, AppResult};
use crate::oas::combine::combine;
use crate::oas::document::{Components, SchemaKind, SchemaNode};
use crate::oas::models::{
    join_init, EnumCase, EnumModel, Model, ModelProperty, ObjectModel, MISSING_DESCRIPTION,
};
use crate::oas::refs::{lookup, ref_name};
use crate::oas::resolver::{expand_type, EnumOwner};
use crate::type_mapping::TypeVocabulary;
use std::borrow::Cow;
use std::collections::HashMap;

/// Expands every named schema into a model, in document order.
///
/// Schemas without an effective `object`/`string` kind produce no model.
///
/// # Arguments
///
/// * `components` - The document's reusable definitions.
/// * `vocabulary` - Spelling of the mapped types.
/// * `strict` - Fail on properties whose type cannot be expanded instead of dropping them.
pub fn expand_models(
    components: &Components,
    vocabulary: &TypeVocabulary,
    strict: bool,
) -> AppResult<Vec<Model>> {
    let mut models = Vec::new();

    for (name, schema) in &components.schemas {
        let effective = effective_schema(name, schema, components)?;

        match &effective.kind {
            Some(SchemaKind::Object) => {
                let model = expand_object(name, &effective, vocabulary, strict)?;
                tracing::debug!(
                    schema = %name,
                    properties = model.properties.len(),
                    enums = model.nested_enums.len(),
                    "expanded object model"
                );
                models.push(Model::Object(model));
            }
            Some(SchemaKind::String) => {
                let model = expand_enum(name, &effective, vocabulary)?;
                tracing::debug!(schema = %name, cases = model.cases.len(), "expanded enum model");
                models.push(Model::Enum(model));
            }
            Some(SchemaKind::Other(kind)) => {
                tracing::debug!(
                    schema = %name,
                    kind = %kind,
                    "skipping schema without a model kind"
                );
            }
            None => {
                tracing::debug!(schema = %name, "skipping schema without a type");
            }
        }
    }

    check_unique_enum_names(&models)?;
    Ok(models)
}

/// Resolves the schema a model is generated from.
///
/// 1. A pure `$ref` combines the schemas sharing the referenced name.
/// 2. An `allOf` combines the referenced schemas in order; members must be plain references.
/// 3. Anything else is used as-is.
pub fn effective_schema<'a>(
    name: &str,
    schema: &'a SchemaNode,
    components: &'a Components,
) -> AppResult<Cow<'a, SchemaNode>> {
    if let Some(reference) = &schema.reference {
        let target = ref_name(reference);
        let resolved = lookup(&target, components).ok_or_else(|| AppError::DanglingReference {
            schema: name.to_string(),
            target: target.clone(),
        })?;

        let mut combined = combine([resolved]);
        combined.description = schema.description.clone();
        return Ok(Cow::Owned(combined));
    }

    if let Some(members) = &schema.all_of {
        let mut resolved = Vec::with_capacity(members.len());
        for member in members {
            let reference = match (&member.reference, &member.scalar_type) {
                (Some(reference), None) => reference,
                _ => {
                    return Err(AppError::UnsupportedAllOf {
                        schema: name.to_string(),
                    })
                }
            };
            let target = ref_name(reference);
            let node = lookup(&target, components).ok_or_else(|| AppError::DanglingReference {
                schema: name.to_string(),
                target: target.clone(),
            })?;
            resolved.push(node);
        }

        let mut combined = combine(resolved);
        combined.description = schema.description.clone();
        return Ok(Cow::Owned(combined));
    }

    Ok(Cow::Borrowed(schema))
}

fn expand_object(
    name: &str,
    schema: &SchemaNode,
    vocabulary: &TypeVocabulary,
    strict: bool,
) -> AppResult<ObjectModel> {
    let mut properties = Vec::with_capacity(schema.properties.len());
    let mut nested_enums = Vec::new();

    for (property_name, node) in &schema.properties {
        let owner = EnumOwner {
            schema: name,
            property: property_name,
        };
        let expansion = match expand_type(node, Some(owner), vocabulary) {
            Ok(expansion) => expansion,
            Err(e) if strict => {
                return Err(AppError::UnresolvedPropertyType {
                    schema: name.to_string(),
                    property: property_name.clone(),
                    reason: e.reason(),
                })
            }
            Err(e) => {
                tracing::warn!(
                    schema = %name,
                    property = %property_name,
                    "dropping property: {}",
                    e.reason()
                );
                continue;
            }
        };

        tracing::trace!(
            schema = %name,
            property = %property_name,
            ty = %expansion.ty,
            "expanded property"
        );

        let description = match &expansion.nested_enum {
            Some(nested) => nested.description.clone(),
            None => node
                .description
                .clone()
                .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
        };

        properties.push(ModelProperty {
            name: property_name.clone(),
            ty: vocabulary.spell(&expansion.ty),
            optional: !schema.required.contains(property_name),
            description,
        });

        if let Some(nested) = expansion.nested_enum {
            nested_enums.push(nested);
        }
    }

    sort_properties(&mut properties);
    let init = join_init(properties.iter().map(|p| (p.name.as_str(), p.ty.as_str())));

    Ok(ObjectModel {
        name: name.to_string(),
        description: describe(schema),
        properties,
        nested_enums,
        init,
    })
}

fn expand_enum(
    name: &str,
    schema: &SchemaNode,
    vocabulary: &TypeVocabulary,
) -> AppResult<EnumModel> {
    let values = match &schema.enum_values {
        Some(values) if !values.is_empty() => values,
        _ => {
            return Err(AppError::MissingEnumValues {
                schema: name.to_string(),
            })
        }
    };

    Ok(EnumModel {
        name: name.to_string(),
        description: describe(schema),
        raw_type: vocabulary.text.clone(),
        cases: values
            .iter()
            .map(|value| EnumCase {
                name: value.clone(),
                description: MISSING_DESCRIPTION.to_string(),
            })
            .collect(),
    })
}

/// Sorts model properties ascending by name.
pub fn sort_properties(properties: &mut [ModelProperty]) {
    properties.sort_by(|a, b| a.name.cmp(&b.name));
}

fn describe(schema: &SchemaNode) -> String {
    schema
        .description
        .clone()
        .unwrap_or_else(|| MISSING_DESCRIPTION.to_string())
}

/// Nested enums share one namespace with each other and with the top-level models.
fn check_unique_enum_names(models: &[Model]) -> AppResult<()> {
    let mut origins: HashMap<&str, String> = models
        .iter()
        .map(|m| (m.name(), format!("schema `{}`", m.name())))
        .collect();

    for model in models {
        let Model::Object(object) = model else {
            continue;
        };
        for nested in &object.nested_enums {
            let origin = format!("a property of schema `{}`", object.name);
            if let Some(first) = origins.get(nested.name.as_str()) {
                return Err(AppError::DuplicateEnumName {
                    name: nested.name.clone(),
                    first: first.clone(),
                    second: origin,
                });
            }
            origins.insert(&nested.name, origin);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::document::ApiDocument;
    use pretty_assertions::assert_eq;

    fn components(yaml: &str) -> Components {
        let doc = format!("info: {{title: T, version: '1'}}\ncomponents:\n  schemas:\n{}", yaml);
        ApiDocument::from_yaml(&doc).unwrap().components
    }

    fn object(model: &Model) -> &ObjectModel {
        match model {
            Model::Object(o) => o,
            other => panic!("expected object model, got {:?}", other),
        }
    }

    #[test]
    fn test_object_model_sorted_and_optional() {
        let c = components(
            r#"
    User:
      type: object
      description: A user
      required: [name]
      properties:
        zip: {type: string}
        name: {type: string, description: Full name}
        age: {type: integer, format: int32}
        pet: {$ref: '#/components/schemas/Pet'}
"#,
        );
        let models = expand_models(&c, &TypeVocabulary::default(), false).unwrap();
        assert_eq!(models.len(), 1);

        let user = object(&models[0]);
        assert_eq!(user.description, "A user");
        let names: Vec<&str> = user.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["age", "name", "pet", "zip"]);

        let name = &user.properties[1];
        assert_eq!(name.ty, "String");
        assert!(!name.optional);
        assert_eq!(name.description, "Full name");

        let age = &user.properties[0];
        assert_eq!(age.ty, "i32");
        assert!(age.optional);
        assert_eq!(age.description, MISSING_DESCRIPTION);

        assert_eq!(user.properties[2].ty, "Pet");
        assert_eq!(user.init, "age: i32, name: String, pet: Pet, zip: String");
    }

    #[test]
    fn test_nested_enum_property() {
        let c = components(
            r#"
    order:
      type: object
      properties:
        status:
          type: string
          enum: [placed, approved]
          description: "Order Status|\n- xxplaced - Placed\n- xxapproved - Approved"
"#,
        );
        let models = expand_models(&c, &TypeVocabulary::default(), false).unwrap();
        let order = object(&models[0]);

        assert_eq!(order.properties[0].ty, "OrderStatus");
        assert_eq!(order.properties[0].description, "Order Status");
        assert_eq!(order.nested_enums.len(), 1);
        let nested = &order.nested_enums[0];
        assert_eq!(nested.name, "OrderStatus");
        assert_eq!(nested.cases[1].name, "approved");
        assert_eq!(nested.cases[1].description, "Approved");
    }

    #[test]
    fn test_enum_model() {
        let c = components(
            r#"
    Color:
      type: string
      description: "Colors|\n- xxred - Red"
      enum: [red, green]
"#,
        );
        let models = expand_models(&c, &TypeVocabulary::default(), false).unwrap();
        let expected = Model::Enum(EnumModel {
            name: "Color".into(),
            description: "Colors|\n- xxred - Red".into(),
            raw_type: "String".into(),
            cases: vec![
                EnumCase {
                    name: "red".into(),
                    description: MISSING_DESCRIPTION.into(),
                },
                EnumCase {
                    name: "green".into(),
                    description: MISSING_DESCRIPTION.into(),
                },
            ],
        });
        assert_eq!(models, vec![expected]);
    }

    #[test]
    fn test_string_schema_without_enum_fails() {
        for body in ["      type: string\n", "      type: string\n      enum: []\n"] {
            let c = components(&format!("    Name:\n{}", body));
            let err = expand_models(&c, &TypeVocabulary::default(), false).unwrap_err();
            assert!(
                matches!(err, AppError::MissingEnumValues { ref schema } if schema == "Name"),
                "{:?}",
                err
            );
        }
    }

    #[test]
    fn test_all_of_combination() {
        let c = components(
            r#"
    Base:
      type: object
      required: [id]
      properties:
        id: {type: integer, format: int64}
        label: {type: string}
    Extra:
      type: object
      required: [label]
      properties:
        label: {type: boolean}
    Both:
      description: Composite
      allOf:
        - $ref: '#/components/schemas/Base'
        - $ref: '#/components/schemas/Extra'
"#,
        );
        let models = expand_models(&c, &TypeVocabulary::default(), false).unwrap();
        assert_eq!(models.len(), 3);
        let both = object(&models[2]);
        assert_eq!(both.name, "Both");
        assert_eq!(both.description, "Composite");
        let props: Vec<(&str, &str, bool)> = both
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.ty.as_str(), p.optional))
            .collect();
        assert_eq!(props, vec![("id", "i64", false), ("label", "bool", false)]);
    }

    #[test]
    fn test_all_of_inline_member_rejected() {
        let c = components(
            r#"
    Base:
      type: object
    Both:
      allOf:
        - $ref: '#/components/schemas/Base'
        - type: object
          properties:
            x: {type: string}
"#,
        );
        let err = expand_models(&c, &TypeVocabulary::default(), false).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedAllOf { ref schema } if schema == "Both"));
    }

    #[test]
    fn test_self_reference_combines_to_empty_object() {
        let c = components(
            r#"
    Foo:
      $ref: '#/components/schemas/Foo'
"#,
        );
        let models = expand_models(&c, &TypeVocabulary::default(), false).unwrap();
        let foo = object(&models[0]);
        assert!(foo.properties.is_empty());
        assert!(foo.nested_enums.is_empty());
    }

    #[test]
    fn test_alias_reference_copies_target() {
        let c = components(
            r#"
    Pet:
      type: object
      properties:
        name: {type: string}
    Animal:
      $ref: '#/components/schemas/Pet'
"#,
        );
        let models = expand_models(&c, &TypeVocabulary::default(), false).unwrap();
        let animal = object(&models[1]);
        assert_eq!(animal.name, "Animal");
        assert_eq!(animal.properties[0].name, "name");
    }

    #[test]
    fn test_dangling_reference_is_fatal() {
        let c = components(
            r#"
    Animal:
      $ref: '#/components/schemas/Missing'
"#,
        );
        let err = expand_models(&c, &TypeVocabulary::default(), false).unwrap_err();
        match err {
            AppError::DanglingReference { schema, target } => {
                assert_eq!(schema, "Animal");
                assert_eq!(target, "Missing");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unexpandable_property_dropped_when_lenient() {
        let c = components(
            r#"
    Thing:
      type: object
      properties:
        ok: {type: boolean}
        blob: {type: object}
        nothing: {description: untyped}
        scores: {type: number, enum: ['1']}
"#,
        );
        let models = expand_models(&c, &TypeVocabulary::default(), false).unwrap();
        let thing = object(&models[0]);
        let names: Vec<&str> = thing.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ok"]);
    }

    #[test]
    fn test_unexpandable_property_fatal_when_strict() {
        let c = components(
            r#"
    Thing:
      type: object
      properties:
        blob: {type: object}
"#,
        );
        let err = expand_models(&c, &TypeVocabulary::default(), true).unwrap_err();
        match err {
            AppError::UnresolvedPropertyType {
                schema, property, ..
            } => {
                assert_eq!(schema, "Thing");
                assert_eq!(property, "blob");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_schemas_without_model_kind_skipped() {
        let c = components(
            r#"
    Count:
      type: integer
    Loose:
      description: nothing here
"#,
        );
        let models = expand_models(&c, &TypeVocabulary::default(), false).unwrap();
        assert!(models.is_empty());
    }

    #[test]
    fn test_duplicate_nested_enum_name() {
        let c = components(
            r#"
    OrderStatus:
      type: string
      enum: [a]
    Order:
      type: object
      properties:
        status: {type: string, enum: [b]}
"#,
        );
        let err = expand_models(&c, &TypeVocabulary::default(), false).unwrap_err();
        assert!(matches!(
            err,
            AppError::DuplicateEnumName { ref name, .. } if name == "OrderStatus"
        ));
    }

    #[test]
    fn test_duplicate_nested_enum_between_models() {
        let c = components(
            r#"
    order:
      type: object
      properties:
        status: {type: string, enum: [a]}
    Order:
      type: object
      properties:
        status: {type: string, enum: [b]}
"#,
        );
        let err = expand_models(&c, &TypeVocabulary::default(), false).unwrap_err();
        match err {
            AppError::DuplicateEnumName { first, second, .. } => {
                assert!(first.contains("`order`"));
                assert!(second.contains("`Order`"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sort_properties() {
        let prop = |name: &str| ModelProperty {
            name: name.into(),
            ty: "String".into(),
            optional: false,
            description: MISSING_DESCRIPTION.into(),
        };
        let mut props = vec![prop("b"), prop("C"), prop("a")];
        sort_properties(&mut props);
        let names: Vec<&str> = props.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["C", "a", "b"]);
    }
}
