#![deny(missing_docs)]

//! # Type Mapping
//!
//! Converts OpenAPI scalar descriptors (`type` + `format`) into concrete target types.
//! Handles primitives, arrays of scalars or references, and the spelling of those
//! types in the target language through a configurable [`TypeVocabulary`].

use crate::error::{AppError, AppResult};
use crate::oas::document::{ItemsNode, PropertyNode, ScalarType};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The concrete primitive kinds the generator knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// `string` + `format: binary`.
    Binary,
    /// Any other `string`.
    Text,
    /// `integer` + `format: int64`.
    Int64,
    /// `integer` + `format: int32`.
    Int32,
    /// `integer` with any other format.
    Int,
    /// `boolean`.
    Bool,
    /// `number` with any format other than float.
    Double,
    /// `number` + `format: float`.
    Float,
}

/// A resolved type, before it is spelled out for a target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A scalar.
    Primitive(Primitive),
    /// A homogeneous sequence.
    Array(Box<TypeRef>),
    /// A named model from `components/schemas`.
    Named(String),
    /// A nested enum generated for a string property.
    Enum(String),
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{:?}", p),
            TypeRef::Array(inner) => write!(f, "array<{}>", inner),
            TypeRef::Named(s) => write!(f, "$ref:{}", s),
            TypeRef::Enum(s) => write!(f, "enum:{}", s),
        }
    }
}

/// Spelling of every type the mapper can produce in the generated sources.
///
/// Defaults target Rust. Any field can be overridden from the project configuration,
/// which is how templates for other languages plug in their own vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TypeVocabulary {
    /// Binary blob (`string` + `binary`).
    pub binary: String,
    /// Text.
    pub text: String,
    /// 64-bit integer.
    pub int64: String,
    /// 32-bit integer.
    pub int32: String,
    /// Platform default integer.
    pub int: String,
    /// Boolean.
    pub boolean: String,
    /// Double precision float.
    pub double: String,
    /// Single precision float.
    pub float: String,
    /// Sequence pattern; `{}` is replaced by the element type.
    pub array: String,
    /// Prefix qualifying model names from endpoint code.
    pub model_namespace: String,
    /// Response type of operations without content.
    pub void: String,
    /// Opening delimiter of a path parameter interpolation.
    pub interpolation_open: String,
    /// Closing delimiter of a path parameter interpolation.
    pub interpolation_close: String,
}

impl Default for TypeVocabulary {
    fn default() -> Self {
        Self {
            binary: "Vec<u8>".into(),
            text: "String".into(),
            int64: "i64".into(),
            int32: "i32".into(),
            int: "isize".into(),
            boolean: "bool".into(),
            double: "f64".into(),
            float: "f32".into(),
            array: "Vec<{}>".into(),
            model_namespace: "models::".into(),
            void: "()".into(),
            interpolation_open: "{".into(),
            interpolation_close: "}".into(),
        }
    }
}

impl TypeVocabulary {
    /// Spells a primitive.
    pub fn primitive(&self, primitive: Primitive) -> &str {
        match primitive {
            Primitive::Binary => &self.binary,
            Primitive::Text => &self.text,
            Primitive::Int64 => &self.int64,
            Primitive::Int32 => &self.int32,
            Primitive::Int => &self.int,
            Primitive::Bool => &self.boolean,
            Primitive::Double => &self.double,
            Primitive::Float => &self.float,
        }
    }

    /// Spells a type as seen from model code: named models stay unqualified,
    /// except as array elements where they are always qualified.
    pub fn spell(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Primitive(p) => self.primitive(*p).to_string(),
            TypeRef::Array(inner) => self.array.replace("{}", &self.spell_qualified(inner)),
            TypeRef::Named(name) | TypeRef::Enum(name) => name.clone(),
        }
    }

    /// Spells a type as seen from endpoint code: named models carry the model namespace.
    pub fn spell_qualified(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named(name) => format!("{}{}", self.model_namespace, name),
            other => self.spell(other),
        }
    }

    /// Wraps a path parameter name in the interpolation delimiters.
    pub fn interpolate(&self, name: &str) -> String {
        format!(
            "{}{}{}",
            self.interpolation_open, name, self.interpolation_close
        )
    }
}

/// Maps a property's scalar descriptor to a [`TypeRef`].
///
/// `string` enums map to plain text here; nested enum generation is the caller's
/// concern since it needs the owning schema and property names.
///
/// # Errors
///
/// `AppError::UnsupportedType` when the pair is outside the mapping table.
pub fn map_scalar(node: &PropertyNode) -> AppResult<TypeRef> {
    let scalar = node
        .scalar_type
        .as_ref()
        .ok_or_else(|| unsupported("<none>", "has no `type`"))?;
    let format = node.format.as_deref();

    match scalar {
        ScalarType::Number | ScalarType::Array if node.enum_values.is_some() => Err(unsupported(
            scalar.as_str(),
            "does not support `enum`; enums are only allowed on `string`",
        )),
        ScalarType::Array => {
            let items = node
                .items
                .as_ref()
                .ok_or_else(|| unsupported("array", "has no `items`"))?;
            let inner = map_items(items)?;
            Ok(TypeRef::Array(Box::new(inner)))
        }
        _ => map_primitive(scalar, format).map(TypeRef::Primitive),
    }
}

/// Maps the `items` descriptor of an array.
///
/// Items may be scalars or references; nested arrays are not supported.
pub fn map_items(items: &ItemsNode) -> AppResult<TypeRef> {
    match (&items.scalar_type, &items.reference) {
        (Some(ScalarType::Array), _) => Err(unsupported(
            "array",
            "nested arrays in `items` are not supported",
        )),
        (Some(scalar), _) => {
            map_primitive(scalar, items.format.as_deref()).map(TypeRef::Primitive)
        }
        (None, Some(reference)) => Ok(TypeRef::Named(crate::oas::refs::ref_name(reference))),
        (None, None) => Err(unsupported("items", "has neither `type` nor `$ref`")),
    }
}

/// The authoritative scalar table.
fn map_primitive(scalar: &ScalarType, format: Option<&str>) -> AppResult<Primitive> {
    match scalar {
        ScalarType::String => match format {
            Some("binary") => Ok(Primitive::Binary),
            _ => Ok(Primitive::Text),
        },
        ScalarType::Integer => match format {
            Some("int64") => Ok(Primitive::Int64),
            Some("int32") => Ok(Primitive::Int32),
            _ => Ok(Primitive::Int),
        },
        ScalarType::Boolean => Ok(Primitive::Bool),
        ScalarType::Number => match format {
            Some("float") | Some("Float") => Ok(Primitive::Float),
            _ => Ok(Primitive::Double),
        },
        ScalarType::Array => Err(unsupported("array", "is not a scalar type")),
        ScalarType::Object => Err(unsupported(
            "object",
            "inline objects are not supported, use `$ref`",
        )),
        ScalarType::Other(other) => Err(unsupported(other, "is not a known scalar type")),
    }
}

fn unsupported(ty: &str, reason: &str) -> AppError {
    AppError::UnsupportedType {
        ty: ty.to_string(),
        reason: reason.to_string(),
    }
}
