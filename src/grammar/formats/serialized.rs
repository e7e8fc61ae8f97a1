//! serde-backed formats
//!
//! Both formats write the full [SyntaxNode] structure: name, position, byte span, token
//! range, text, captures and children.

use super::{Format, FormatError};
use crate::grammar::parsing::SyntaxNode;

pub(super) fn json(tree: &SyntaxNode, compact: bool) -> Result<String, FormatError> {
    let written = if compact {
        serde_json::to_string(tree)
    } else {
        serde_json::to_string_pretty(tree)
    };
    written.map_err(|err| FormatError::Serialization {
        format: Format::Json,
        message: err.to_string(),
    })
}

/// Pretty-printed JSON.
pub fn to_json_str(tree: &SyntaxNode) -> Result<String, FormatError> {
    json(tree, false)
}

pub fn to_yaml_str(tree: &SyntaxNode) -> Result<String, FormatError> {
    serde_yaml::to_string(tree).map_err(|err| FormatError::Serialization {
        format: Format::Yaml,
        message: err.to_string(),
    })
}
