#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helper functions for deriving generated type and file names from schema names and raw paths.

/// Upper-cases the first character and leaves the rest untouched.
///
/// e.g. `userId` -> `UserId`
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name of the nested enum generated for an enum property.
///
/// e.g. (`order`, `status`) -> `OrderStatus`
pub fn nested_enum_name(schema_name: &str, property_name: &str) -> String {
    format!(
        "{}{}",
        capitalize_first(schema_name),
        capitalize_first(property_name)
    )
}

/// Derives the endpoint group (and output file) name from a raw path.
///
/// Literal segments are capitalized; `{param}` segments become `By<Param>` where
/// underscore separated words are capitalized and `Id` is spelled `ID`.
///
/// e.g. `/users/{user_id}/posts` -> `UsersByUserIDPosts`
pub fn group_name(path: &str) -> String {
    path.split('/')
        .map(|segment| match parameter_name(segment) {
            Some(param) => format!("By{}", parameter_words(param)),
            None => capitalize_first(segment),
        })
        .collect()
}

/// Returns the inner name of a `{param}` segment.
pub(crate) fn parameter_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

fn parameter_words(param: &str) -> String {
    param
        .split('_')
        .map(|word| match capitalize_first(word).as_str() {
            "Id" => "ID".to_string(),
            other => other.to_string(),
        })
        .collect()
}
