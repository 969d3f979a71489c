#![deny(missing_docs)]

//! # Enum Descriptions
//!
//! Extracts per-case documentation embedded in a string enum's `description`.
//!
//! The micro-format is line oriented:
//!
//! ```text
//! Shared description of the enum|
//! - xxFIRST - What the first case means
//! - xxSECOND - What the second case means
//! ```
//!
//! A first line ending in `|` is the shared description. Every other line that splits
//! into exactly two parts on ` - ` documents one case; the case literal follows a
//! two-character marker (`xx` above).

use indexmap::IndexMap;

/// Documentation parsed out of an enum description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumDescription {
    /// The shared line, without its pipe.
    pub shared: Option<String>,
    /// Case literal -> description.
    pub cases: IndexMap<String, String>,
}

/// Parses the enum documentation micro-format. `None` yields an empty result.
pub fn parse_enum_description(description: Option<&str>) -> EnumDescription {
    let mut parsed = EnumDescription::default();
    let Some(text) = description else {
        return parsed;
    };

    let mut lines = text.lines().peekable();
    if let Some(first) = lines.peek() {
        if first.ends_with('|') {
            parsed.shared = Some(first.replace('|', ""));
            lines.next();
        }
    }

    for line in lines {
        let parts: Vec<&str> = line.split(" - ").collect();
        if let [marker, description] = parts.as_slice() {
            let name = case_name(marker);
            parsed.cases.insert(name, description.to_string());
        }
    }

    parsed
}

/// Strips the list dash (if any) and the two-character case marker.
fn case_name(marker: &str) -> String {
    let marker = marker.strip_prefix("- ").unwrap_or(marker);
    marker.chars().skip(2).collect()
}
