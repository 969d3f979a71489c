//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Every failure of a generation run is fatal, so the variants carry enough
//! context (schema, property, method, path) to point at the offending node.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The API document (or another YAML input) could not be deserialized.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// A JSON input (project configuration, template context) was malformed.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// A scalar kind/format pair has no mapping, or an enum is used on a kind
    /// that does not allow one.
    #[from(ignore)]
    #[display("Unsupported type `{ty}`: {reason}")]
    UnsupportedType {
        /// The offending `type` literal (or `$ref`/`items` marker).
        ty: String,
        /// Why the mapping failed.
        reason: String,
    },

    /// An `allOf` element is not a plain `$ref`.
    #[from(ignore)]
    #[display("Schema `{schema}`: only `$ref` elements are supported inside `allOf`")]
    UnsupportedAllOf {
        /// Name of the composed schema.
        schema: String,
    },

    /// A top-level `string` schema has no `enum` values.
    #[from(ignore)]
    #[display("Schema `{schema}` has type `string` but does not declare any `enum` values")]
    MissingEnumValues {
        /// Name of the schema.
        schema: String,
    },

    /// A `$ref` (or `allOf` member) names a schema missing from `components/schemas`.
    #[from(ignore)]
    #[display("Schema `{schema}` references `{target}`, which is not defined in components/schemas")]
    DanglingReference {
        /// Name of the schema holding the reference.
        schema: String,
        /// The referenced name.
        target: String,
    },

    /// Strict mode: an object property whose type cannot be expanded.
    #[from(ignore)]
    #[display("Property `{property}` of schema `{schema}` has no supported type: {reason}")]
    UnresolvedPropertyType {
        /// Name of the schema.
        schema: String,
        /// Name of the property.
        property: String,
        /// Why the expansion failed.
        reason: String,
    },

    /// Two nested enums (or a nested enum and a model) share a generated name.
    #[from(ignore)]
    #[display("Enum name `{name}` is generated by both `{first}` and `{second}`")]
    DuplicateEnumName {
        /// The colliding name.
        name: String,
        /// Origin of the first definition.
        first: String,
        /// Origin of the second definition.
        second: String,
    },

    /// Two distinct paths collapse into the same group name.
    #[from(ignore)]
    #[display("Paths `{first}` and `{second}` both map to endpoint group `{name}`")]
    DuplicateGroupName {
        /// The colliding group name.
        name: String,
        /// The first raw path.
        first: String,
        /// The second raw path.
        second: String,
    },

    /// A parameter schema cannot be typed.
    #[from(ignore)]
    #[display("Unsupported type of parameter `{parameter}` for {method} in {path}: {reason}")]
    UnsupportedParameterType {
        /// Parameter name.
        parameter: String,
        /// HTTP method.
        method: String,
        /// Raw path.
        path: String,
        /// Why the expansion failed.
        reason: String,
    },

    /// A path item carries a key that is neither an HTTP method, a supported
    /// field nor an `x-` extension (e.g. a path level `$ref`).
    #[from(ignore)]
    #[display("Unsupported key `{key}` in path item {path}")]
    UnsupportedPathItemKey {
        /// The offending key.
        key: String,
        /// Raw path.
        path: String,
    },

    /// A parameter is located neither `in: path` nor `in: query`.
    #[from(ignore)]
    #[display("Unsupported location `{location}` of parameter `{parameter}` for {method} in {path}")]
    UnsupportedParameterLocation {
        /// Parameter name.
        parameter: String,
        /// The declared `in` value.
        location: String,
        /// HTTP method.
        method: String,
        /// Raw path.
        path: String,
    },

    /// A request body declares more than one content type.
    #[from(ignore)]
    #[display("Multiple content types in request body are not supported for {method} in {path}")]
    MultipleContentTypes {
        /// HTTP method.
        method: String,
        /// Raw path.
        path: String,
    },

    /// The request body schema cannot be typed.
    #[from(ignore)]
    #[display("Unsupported type of body parameter for {method} in {path}: {reason}")]
    UnsupportedBodyType {
        /// HTTP method.
        method: String,
        /// Raw path.
        path: String,
        /// Why the expansion failed.
        reason: String,
    },

    /// The `200` response declares a content type other than `application/json`.
    #[from(ignore)]
    #[display("Unsupported response content type `{content_type}` for {method} in {path}")]
    UnsupportedResponseContentType {
        /// The declared media type.
        content_type: String,
        /// HTTP method.
        method: String,
        /// Raw path.
        path: String,
    },

    /// The `200` response schema cannot be typed.
    #[from(ignore)]
    #[display("Unsupported type of response for {method} in {path}: {reason}")]
    UnsupportedResponseType {
        /// HTTP method.
        method: String,
        /// Raw path.
        path: String,
        /// Why the expansion failed.
        reason: String,
    },

    /// A template failed to load or render.
    #[from(ignore)]
    #[display("Template `{template}` failed: {message}")]
    Template {
        /// Template name inside the bundle.
        template: String,
        /// Renderer diagnostics.
        message: String,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Short human readable cause used when a lower level error is rewrapped
    /// with a more specific context (e.g. parameter or body errors).
    pub fn reason(&self) -> String {
        match self {
            AppError::UnsupportedType { ty, reason } => format!("`{}` {}", ty, reason),
            other => other.to_string(),
        }
    }
}
