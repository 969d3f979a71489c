#![deny(missing_docs)]

//! # Document Shapes
//!
//! Strict serde structs for the subset of the OpenAPI document the generator consumes.
//!
//! The loose, JSON-Schema-like input is narrowed here into explicit optional fields.
//! Maps are `IndexMap`s so that document order survives deserialization; every
//! order-sensitive output is still sorted explicitly by the expanders.

use crate::error::AppResult;
use indexmap::IndexMap;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Root of an API description.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDocument {
    /// General API metadata.
    pub info: Info,
    /// Server list, in document order.
    #[serde(default)]
    pub servers: Vec<Server>,
    /// Reusable definitions.
    #[serde(default)]
    pub components: Components,
    /// Raw path -> path item.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}

impl ApiDocument {
    /// Parses a YAML (or JSON) API description.
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let document = serde_yaml::from_str(content)?;
        Ok(document)
    }
}

/// The `info` block.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// Free text description.
    #[serde(default)]
    pub description: Option<String>,
    /// API version. Unquoted YAML numbers keep their literal text (`1.10`).
    pub version: String,
}

/// One entry of the `servers` block.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Server {
    /// Optional server name; generated as `server<index>` when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Base URL.
    pub url: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// The `components` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    /// Named schemas.
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaNode>,
}

/// Kind of a named schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    /// `type: object`.
    Object,
    /// `type: string`.
    String,
    /// Any other literal; such schemas never produce a model.
    Other(String),
}

impl From<String> for SchemaKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "object" => SchemaKind::Object,
            "string" => SchemaKind::String,
            _ => SchemaKind::Other(value),
        }
    }
}

impl<'de> Deserialize<'de> for SchemaKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SchemaKind::from)
    }
}

/// One named definition under `components/schemas`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaNode {
    /// `type`.
    #[serde(rename = "type", default)]
    pub kind: Option<SchemaKind>,
    /// `$ref`.
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    /// `allOf` members.
    #[serde(rename = "allOf", default)]
    pub all_of: Option<Vec<PropertyNode>>,
    /// `enum` literals.
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<String>>,
    /// Free text, possibly carrying per-case enum documentation.
    #[serde(default)]
    pub description: Option<String>,
    /// Mandatory property names.
    #[serde(default)]
    pub required: Vec<String>,
    /// Property name -> descriptor.
    #[serde(default)]
    pub properties: IndexMap<String, PropertyNode>,
}

/// Scalar `type` literal of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarType {
    /// `string`.
    String,
    /// `integer`.
    Integer,
    /// `boolean`.
    Boolean,
    /// `number`.
    Number,
    /// `array`.
    Array,
    /// `object` (inline objects are rejected by the mapper).
    Object,
    /// Anything else, kept verbatim for diagnostics.
    Other(String),
}

impl ScalarType {
    /// The literal as written in the document.
    pub fn as_str(&self) -> &str {
        match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Boolean => "boolean",
            ScalarType::Number => "number",
            ScalarType::Array => "array",
            ScalarType::Object => "object",
            ScalarType::Other(s) => s,
        }
    }
}

impl From<String> for ScalarType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "string" => ScalarType::String,
            "integer" => ScalarType::Integer,
            "boolean" => ScalarType::Boolean,
            "number" => ScalarType::Number,
            "array" => ScalarType::Array,
            "object" => ScalarType::Object,
            _ => ScalarType::Other(value),
        }
    }
}

impl<'de> Deserialize<'de> for ScalarType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ScalarType::from)
    }
}

/// A property, parameter, body or response type descriptor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertyNode {
    /// `type`.
    #[serde(rename = "type", default)]
    pub scalar_type: Option<ScalarType>,
    /// `format` hint.
    #[serde(default)]
    pub format: Option<String>,
    /// `$ref`.
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    /// Free text.
    #[serde(default)]
    pub description: Option<String>,
    /// Element descriptor of arrays.
    #[serde(default)]
    pub items: Option<ItemsNode>,
    /// `enum` literals.
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<String>>,
}

/// Element descriptor of an array property.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ItemsNode {
    /// `type`.
    #[serde(rename = "type", default)]
    pub scalar_type: Option<ScalarType>,
    /// `format` hint.
    #[serde(default)]
    pub format: Option<String>,
    /// `$ref`.
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
}

/// Operation keys of a path item.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// All operations declared on one raw path.
#[derive(Debug, Clone, Default)]
pub struct PathItem {
    /// Path level summary.
    pub summary: Option<String>,
    /// Path level description.
    pub description: Option<String>,
    /// Parameters shared by every operation of the path.
    pub parameters: Vec<Parameter>,
    /// HTTP method -> operation.
    pub operations: IndexMap<String, Operation>,
    /// Keys that are neither operations, known fields nor `x-` extensions.
    pub unsupported_keys: Vec<String>,
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PathItemVisitor)
    }
}

/// Walks the path item map directly; operations are not buffered, so scalars
/// inside them keep their literal text.
struct PathItemVisitor;

impl<'de> Visitor<'de> for PathItemVisitor {
    type Value = PathItem;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a path item mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PathItem, A::Error> {
        let mut item = PathItem::default();

        while let Some(key) = map.next_key::<String>()? {
            if HTTP_METHODS.contains(&key.as_str()) {
                let operation: Operation = map.next_value()?;
                item.operations.insert(key, operation);
                continue;
            }

            match key.as_str() {
                "summary" => item.summary = map.next_value()?,
                "description" => item.description = map.next_value()?,
                "parameters" => item.parameters = map.next_value()?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                    if !key.starts_with("x-") && key != "servers" {
                        item.unsupported_keys.push(key);
                    }
                }
            }
        }

        Ok(item)
    }
}

/// A single operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Operation {
    /// Short summary, used as the endpoint description.
    #[serde(default)]
    pub summary: Option<String>,
    /// Long description, used when `summary` is absent.
    #[serde(default)]
    pub description: Option<String>,
    /// Declared parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Request body.
    #[serde(rename = "requestBody", default)]
    pub request_body: Option<RequestBody>,
    /// Status code -> response.
    #[serde(default)]
    pub responses: IndexMap<ResponseCode, Response>,
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Location (`path`, `query`, ...).
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Free text.
    #[serde(default)]
    pub description: Option<String>,
    /// Type descriptor.
    pub schema: PropertyNode,
}

/// A request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    /// Media type -> payload.
    #[serde(default)]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// A response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    /// Free text.
    #[serde(default)]
    pub description: Option<String>,
    /// Media type -> payload.
    #[serde(default)]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// A payload of a given media type.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaType {
    /// Payload type descriptor.
    pub schema: PropertyNode,
}

/// A response status code key; YAML allows both `200:` and `"200":`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponseCode(pub String);

impl ResponseCode {
    /// The success code the generator consults.
    pub fn is_ok(&self) -> bool {
        self.0 == "200"
    }
}

impl<'de> Deserialize<'de> for ResponseCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        StatusKey::deserialize(deserializer).map(|key| match key {
            StatusKey::Text(s) => ResponseCode(s),
            StatusKey::Number(n) => ResponseCode(n.to_string()),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusKey {
    Text(String),
    Number(u64),
}
