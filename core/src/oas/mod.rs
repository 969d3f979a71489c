#![deny(missing_docs)]

//! # OpenAPI Expansion Module
//!
//! - **document**: Strict serde shapes of the input document.
//! - **refs**: `$ref` resolution.
//! - **combine**: `allOf` / alias flattening.
//! - **descriptions**: Per-case enum documentation.
//! - **naming**: Generated type and group names.
//! - **resolver**: The shared type expansion rule.
//! - **schemas**: Model expansion.
//! - **routes**: Endpoint expansion.
//! - **models**: Intermediate Representation definitions.

pub mod combine;
pub mod descriptions;
pub mod document;
pub mod models;
pub mod naming;
pub mod refs;
pub mod resolver;
pub mod routes;
pub mod schemas;

use crate::error::AppResult;
use crate::type_mapping::TypeVocabulary;

pub use document::ApiDocument;
pub use models::{
    EndpointGroup, EnumModel, GeneratedApi, Model, ObjectModel, ParamLocation,
    MISSING_DESCRIPTION,
};
pub use routes::expand_endpoints;
pub use schemas::expand_models;

/// Knobs of the expansion stage.
#[derive(Debug, Clone, Default)]
pub struct ExpandOptions {
    /// Target spelling of the mapped types.
    pub vocabulary: TypeVocabulary,
    /// Fail on object properties whose type cannot be expanded instead of dropping them.
    pub strict: bool,
}

/// Narrows a parsed document into the generated API IR.
pub fn expand_document(
    document: &ApiDocument,
    options: &ExpandOptions,
) -> AppResult<GeneratedApi> {
    let models = expand_models(&document.components, &options.vocabulary, options.strict)?;
    let groups = expand_endpoints(&document.paths, &options.vocabulary)?;

    let servers = document
        .servers
        .iter()
        .enumerate()
        .map(|(index, server)| {
            let mut server = server.clone();
            server.name.get_or_insert_with(|| format!("server{}", index));
            server
        })
        .collect();

    tracing::info!(
        models = models.len(),
        groups = groups.len(),
        "expanded API document `{}`",
        document.info.title
    );

    Ok(GeneratedApi {
        info: document.info.clone(),
        servers,
        models,
        groups,
    })
}

/// Parses a YAML (or JSON) document and expands it.
pub fn parse_and_expand(content: &str, options: &ExpandOptions) -> AppResult<GeneratedApi> {
    let document = ApiDocument::from_yaml(content)?;
    expand_document(&document, options)
}
