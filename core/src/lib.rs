#![deny(missing_docs)]

//! # Tamplier Core
//!
//! Core library of the OpenAPI client generator: parses an OpenAPI 3 document,
//! narrows it into a typed intermediate representation and renders it through a
//! template bundle.

/// Shared error types.
pub mod error;

/// Scalar type mapping and target-language spelling.
pub mod type_mapping;

/// OpenAPI (OAS) parsing and expansion.
pub mod oas;

/// Template rendering of the expanded API.
pub mod codegen;

pub use codegen::{
    generate, OutputLayout, RenderJob, RenderPlan, RenderedFile, TemplateRenderer, TeraRenderer,
};
pub use error::{AppError, AppResult};
pub use oas::{
    expand_document, parse_and_expand, ApiDocument, EndpointGroup, EnumModel, ExpandOptions,
    GeneratedApi, Model, ObjectModel,
};
pub use type_mapping::{Primitive, TypeRef, TypeVocabulary};
