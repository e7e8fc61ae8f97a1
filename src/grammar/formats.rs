//! Output formats for syntax trees
//!
//! A [Format] renders a [SyntaxNode] tree as text:
//! - treeviz: one line per node, indented, with the matched text
//! - json, yaml: the serde representation of the tree
//!
//! Formats are picked by name (`"treeviz".parse::<Format>()`) and rendered with
//! [FormatOptions]; options a format has no use for are ignored.

pub mod serialized;
pub mod treeviz;

pub use serialized::{to_json_str, to_yaml_str};
pub use treeviz::to_treeviz_str;

use crate::grammar::parsing::SyntaxNode;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    UnknownFormat(String),
    Serialization { format: Format, message: String },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownFormat(name) => {
                write!(f, "unknown format '{name}' (expected one of treeviz, json, yaml)")
            }
            FormatError::Serialization { format, message } => {
                write!(f, "cannot write tree as {format}: {message}")
            }
        }
    }
}

impl std::error::Error for FormatError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// treeviz: prefix each node with the one-based line it starts on
    pub line_numbers: bool,
    /// treeviz: characters of matched text shown before truncating
    pub text_width: usize,
    /// json: a single line instead of indented output
    pub compact: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            line_numbers: false,
            text_width: 30,
            compact: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Treeviz,
    Json,
    Yaml,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Treeviz, Format::Json, Format::Yaml];

    pub const fn name(self) -> &'static str {
        match self {
            Format::Treeviz => "treeviz",
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    pub fn render(self, tree: &SyntaxNode, options: &FormatOptions) -> Result<String, FormatError> {
        match self {
            Format::Treeviz => Ok(treeviz::render(tree, options)),
            Format::Json => serialized::json(tree, options.compact),
            Format::Yaml => to_yaml_str(tree),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| FormatError::UnknownFormat(name.to_string()))
    }
}
