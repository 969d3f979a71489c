#![deny(missing_docs)]

//! # Routes Module
//!
//! Expands OpenAPI `paths` into endpoint groups: one group per raw path, one
//! endpoint per HTTP method.

use crate::error::{AppError, AppResult};
use crate::oas::document::{Operation, Parameter, PathItem};
use crate::oas::models::{
    join_init, Endpoint, EndpointGroup, EndpointParameter, ParamLocation, MISSING_DESCRIPTION,
};
use crate::oas::naming::group_name;
use crate::oas::resolver::expand_type;
use crate::type_mapping::TypeVocabulary;
use indexmap::IndexMap;
use std::collections::HashMap;

/// The only response media type the generator understands.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Expands every path into an endpoint group, in document order.
///
/// # Errors
///
/// Fails on the first unsupported parameter, body or response, and when two
/// distinct paths collapse into the same group name.
pub fn expand_endpoints(
    paths: &IndexMap<String, PathItem>,
    vocabulary: &TypeVocabulary,
) -> AppResult<Vec<EndpointGroup>> {
    let mut groups = Vec::with_capacity(paths.len());
    let mut seen: HashMap<String, &str> = HashMap::new();

    for (path, item) in paths {
        if let Some(key) = item.unsupported_keys.first() {
            return Err(AppError::UnsupportedPathItemKey {
                key: key.clone(),
                path: path.clone(),
            });
        }

        let name = group_name(path);
        if let Some(first) = seen.insert(name.clone(), path) {
            return Err(AppError::DuplicateGroupName {
                name,
                first: first.to_string(),
                second: path.clone(),
            });
        }

        let mut endpoints = item
            .operations
            .iter()
            .map(|(method, operation)| {
                expand_endpoint(&name, path, item, method, operation, vocabulary)
            })
            .collect::<AppResult<Vec<_>>>()?;
        sort_endpoints(&mut endpoints);

        tracing::debug!(
            group = %name,
            path = %path,
            endpoints = endpoints.len(),
            "expanded endpoint group"
        );

        groups.push(EndpointGroup {
            name,
            path: path.clone(),
            endpoints,
        });
    }

    Ok(groups)
}

fn expand_endpoint(
    group: &str,
    path: &str,
    item: &PathItem,
    method: &str,
    operation: &Operation,
    vocabulary: &TypeVocabulary,
) -> AppResult<Endpoint> {
    let display_method = method.to_uppercase();
    let mut template = path.to_string();
    let mut path_parameters = Vec::new();
    let mut query_parameters = Vec::new();
    let mut parameters = Vec::new();

    for parameter in merge_parameters(&item.parameters, &operation.parameters) {
        let expansion = expand_type(&parameter.schema, None, vocabulary).map_err(|e| {
            AppError::UnsupportedParameterType {
                parameter: parameter.name.clone(),
                method: display_method.clone(),
                path: path.to_string(),
                reason: e.reason(),
            }
        })?;

        let mut param = EndpointParameter {
            name: parameter.name.clone(),
            ty: vocabulary.spell(&expansion.ty),
            optional: !parameter.required,
            location: ParamLocation::Query,
        };

        match parameter.location.as_str() {
            "path" => {
                let placeholder = format!("{{{}}}", parameter.name);
                template =
                    template.replace(&placeholder, &vocabulary.interpolate(&parameter.name));
                // Path parameters are always part of the URL.
                param.optional = false;
                param.location = ParamLocation::Path;
                path_parameters.push(param.clone());
            }
            "query" => query_parameters.push(param.clone()),
            other => {
                return Err(AppError::UnsupportedParameterLocation {
                    parameter: parameter.name.clone(),
                    location: other.to_string(),
                    method: display_method,
                    path: path.to_string(),
                })
            }
        }

        parameters.push(param);
    }

    let mut content_type = JSON_CONTENT_TYPE.to_string();
    let mut body_type = None;
    if let Some(content) = operation.request_body.as_ref().and_then(|b| b.content.as_ref()) {
        if content.len() > 1 {
            return Err(AppError::MultipleContentTypes {
                method: display_method,
                path: path.to_string(),
            });
        }

        if let Some((media_type, payload)) = content.first() {
            let expansion = expand_type(&payload.schema, None, vocabulary).map_err(|e| {
                AppError::UnsupportedBodyType {
                    method: display_method.clone(),
                    path: path.to_string(),
                    reason: e.reason(),
                }
            })?;
            let ty = vocabulary.spell_qualified(&expansion.ty);

            parameters.push(EndpointParameter {
                name: "body".into(),
                ty: ty.clone(),
                optional: false,
                location: ParamLocation::Body,
            });
            body_type = Some(ty);
            content_type = media_type.clone();
        }
    }

    let response_type = response_type(operation, &display_method, path, vocabulary)?;

    // Declaration order, body last.
    let init = join_init(parameters.iter().map(|p| (p.name.as_str(), p.ty.as_str())));

    sort_descending_by_name(&mut query_parameters);
    sort_descending_by_name(&mut parameters);

    let description = operation
        .summary
        .clone()
        .or_else(|| operation.description.clone())
        .or_else(|| item.summary.clone())
        .unwrap_or_else(|| MISSING_DESCRIPTION.to_string());

    Ok(Endpoint {
        group_name: group.to_string(),
        method: method.to_lowercase(),
        description,
        path: template
            .strip_prefix('/')
            .unwrap_or(&template)
            .to_string(),
        path_parameters,
        query_parameters,
        parameters,
        body_type,
        content_type,
        response_type,
        init,
    })
}

/// Resolves the type of the `200` response; every other status code is ignored.
///
/// A missing `200` response, or one without content, yields the void sentinel.
/// Only named models get the model namespace; primitives and arrays of primitives
/// are spelled bare, the same as request bodies.
fn response_type(
    operation: &Operation,
    method: &str,
    path: &str,
    vocabulary: &TypeVocabulary,
) -> AppResult<String> {
    let mut resolved = vocabulary.void.clone();

    let Some(response) = operation
        .responses
        .iter()
        .find_map(|(code, response)| code.is_ok().then_some(response))
    else {
        return Ok(resolved);
    };

    for (media_type, payload) in response.content.iter().flatten() {
        if media_type != JSON_CONTENT_TYPE {
            return Err(AppError::UnsupportedResponseContentType {
                content_type: media_type.clone(),
                method: method.to_string(),
                path: path.to_string(),
            });
        }

        let expansion = expand_type(&payload.schema, None, vocabulary).map_err(|e| {
            AppError::UnsupportedResponseType {
                method: method.to_string(),
                path: path.to_string(),
                reason: e.reason(),
            }
        })?;
        resolved = vocabulary.spell_qualified(&expansion.ty);
    }

    Ok(resolved)
}

/// Path level parameters apply to every operation unless the operation redeclares
/// the same `(name, in)` pair.
fn merge_parameters<'a>(shared: &'a [Parameter], own: &'a [Parameter]) -> Vec<&'a Parameter> {
    shared
        .iter()
        .filter(|s| {
            !own.iter()
                .any(|o| o.name == s.name && o.location == s.location)
        })
        .chain(own.iter())
        .collect()
}

/// Sorts parameters descending by name, the order generated initializers expect.
pub fn sort_descending_by_name(parameters: &mut [EndpointParameter]) {
    parameters.sort_by(|a, b| b.name.cmp(&a.name));
}

/// Sorts the endpoints of a group ascending by method.
pub fn sort_endpoints(endpoints: &mut [Endpoint]) {
    endpoints.sort_by(|a, b| a.method.cmp(&b.method));
}
