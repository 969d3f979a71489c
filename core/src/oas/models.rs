#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Definition of the Intermediate Representation (IR) produced by the expanders.
//!
//! These structs transport the narrowed document into the code generation stage.
//! They are serialized as template contexts, so field names are part of the
//! template contract.

use crate::oas::document::{Info, Server};
use serde::Serialize;

/// Placeholder used wherever the document carries no description.
pub const MISSING_DESCRIPTION: &str = "Description not provided";

/// A generated model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Model {
    /// A record type.
    Object(ObjectModel),
    /// A closed set of string literals.
    Enum(EnumModel),
}

impl Model {
    /// The generated type name.
    pub fn name(&self) -> &str {
        match self {
            Model::Object(o) => &o.name,
            Model::Enum(e) => &e.name,
        }
    }
}

/// A record type generated from an `object` schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectModel {
    /// Schema name.
    pub name: String,
    /// Schema description.
    pub description: String,
    /// Properties, sorted ascending by name.
    pub properties: Vec<ModelProperty>,
    /// Enums generated for string-enum properties.
    pub nested_enums: Vec<EnumModel>,
    /// Prejoined `name: type` list of the properties, for initializer signatures.
    pub init: String,
}

/// One property of an object model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelProperty {
    /// Property name as written in the document.
    pub name: String,
    /// Spelled target type (without optionality).
    #[serde(rename = "type")]
    pub ty: String,
    /// True unless listed in `required`.
    pub optional: bool,
    /// Property description.
    pub description: String,
}

/// An enum, either a top-level string schema or nested in an object model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumModel {
    /// Generated type name.
    pub name: String,
    /// Shared description.
    pub description: String,
    /// Spelled type of the raw literal values.
    pub raw_type: String,
    /// Cases in document order.
    pub cases: Vec<EnumCase>,
}

/// One enum case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumCase {
    /// The literal value.
    pub name: String,
    /// Case description.
    pub description: String,
}

/// Where an endpoint parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Interpolated into the path.
    Path,
    /// Appended to the query string.
    Query,
    /// The synthetic request body parameter.
    Body,
}

/// A parameter of a generated operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointParameter {
    /// Parameter name (`body` for the request body).
    pub name: String,
    /// Spelled target type (without optionality).
    #[serde(rename = "type")]
    pub ty: String,
    /// True for non-required parameters.
    pub optional: bool,
    /// Location.
    pub location: ParamLocation,
}

/// One operation (path + method).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    /// Group name derived from the raw path.
    pub group_name: String,
    /// Lower-case HTTP method.
    pub method: String,
    /// Operation summary.
    pub description: String,
    /// Path with parameters rewritten as interpolations and no leading slash.
    pub path: String,
    /// Path parameters, in declaration order.
    pub path_parameters: Vec<EndpointParameter>,
    /// Query parameters, sorted descending by name.
    pub query_parameters: Vec<EndpointParameter>,
    /// Every parameter including `body`, sorted descending by name.
    pub parameters: Vec<EndpointParameter>,
    /// Request body type, if any.
    pub body_type: Option<String>,
    /// Media type of the request body.
    pub content_type: String,
    /// Response type of the `200` response, or the void sentinel.
    pub response_type: String,
    /// Prejoined `name: type` list of `parameters`, for call signatures.
    pub init: String,
}

/// All operations of one raw path; rendered as one output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointGroup {
    /// Group name (also the output file stem).
    pub name: String,
    /// The raw path.
    pub path: String,
    /// Operations, sorted ascending by method.
    pub endpoints: Vec<Endpoint>,
}

/// Everything a generation run renders.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedApi {
    /// API metadata.
    pub info: Info,
    /// Servers, each with a name.
    pub servers: Vec<Server>,
    /// Models in document order.
    pub models: Vec<Model>,
    /// Endpoint groups in document order.
    pub groups: Vec<EndpointGroup>,
}

/// Joins `(name, type)` pairs as `name: type, name: type`.
pub fn join_init<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(name, ty)| format!("{}: {}", name, ty))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_init() {
        assert_eq!(
            join_init([("id", "i64"), ("tags", "Vec<String>")]),
            "id: i64, tags: Vec<String>"
        );
        assert_eq!(join_init(Vec::<(&str, &str)>::new()), "");
    }
}
