//! Error values surfaced by the compiler and the scanner
//!
//! Compiling a description either yields a complete grammar or a [StructuralError]; there
//! is no partial grammar. Parsing fails only when the input cannot be tokenized
//! ([ScanError]) or the start production does not exist. A production that does not match,
//! or matches without consuming the whole input, is an ordinary outcome and is reported
//! through [ParseOutcome](crate::grammar::parsing::ParseOutcome), never as an error.

use crate::grammar::location::Position;
use std::fmt;

/// Failure to compile a grammar description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// A character that starts no token of the description language
    UnexpectedCharacter { position: Position, found: char },
    /// A closing `)` or `]` with no matching opener, or closing the wrong opener
    UnbalancedGroup { position: Position, delimiter: char },
    /// An opening `(` or `[` still open at the end of the description
    UnclosedGroup { position: Position, delimiter: char },
    /// A statement that is not `token`, `skip` or `::=` shaped
    MalformedStatement { position: Position, message: String },
    /// A backtick pattern outside the restricted dialect
    InvalidPattern { position: Position, message: String },
    DuplicateDefinition { position: Position, name: String },
    /// A name that no statement of the description defines
    UndefinedReference { position: Position, name: String },
    /// A terminal whose pattern reaches itself through other terminals
    RecursiveTerminal { position: Position, name: String },
    /// A production name used inside a `token` or `skip` pattern
    ProductionInTerminal { position: Position, name: String },
}

impl StructuralError {
    pub fn position(&self) -> Position {
        match self {
            StructuralError::UnexpectedCharacter { position, .. }
            | StructuralError::UnbalancedGroup { position, .. }
            | StructuralError::UnclosedGroup { position, .. }
            | StructuralError::MalformedStatement { position, .. }
            | StructuralError::InvalidPattern { position, .. }
            | StructuralError::DuplicateDefinition { position, .. }
            | StructuralError::UndefinedReference { position, .. }
            | StructuralError::RecursiveTerminal { position, .. }
            | StructuralError::ProductionInTerminal { position, .. } => *position,
        }
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralError::UnexpectedCharacter { position, found } => {
                write!(f, "{position}: unexpected character {found:?}")
            }
            StructuralError::UnbalancedGroup {
                position,
                delimiter,
            } => write!(f, "{position}: '{delimiter}' closes nothing"),
            StructuralError::UnclosedGroup {
                position,
                delimiter,
            } => write!(f, "{position}: '{delimiter}' is never closed"),
            StructuralError::MalformedStatement { position, message } => {
                write!(f, "{position}: malformed statement: {message}")
            }
            StructuralError::InvalidPattern { position, message } => {
                write!(f, "{position}: invalid pattern: {message}")
            }
            StructuralError::DuplicateDefinition { position, name } => {
                write!(f, "{position}: '{name}' is defined more than once")
            }
            StructuralError::UndefinedReference { position, name } => {
                write!(f, "{position}: '{name}' is never defined")
            }
            StructuralError::RecursiveTerminal { position, name } => {
                write!(f, "{position}: terminal '{name}' refers to itself")
            }
            StructuralError::ProductionInTerminal { position, name } => {
                write!(f, "{position}: production '{name}' used in a terminal pattern")
            }
        }
    }
}

impl std::error::Error for StructuralError {}

/// No terminal or skip rule matches the input at `offset`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub offset: usize,
    pub position: Position,
    /// A few characters of the unmatched input, for diagnostics
    pub excerpt: String,
}

impl ScanError {
    const EXCERPT_CHARS: usize = 16;

    pub(crate) fn unmatched(source: &str, offset: usize, position: Position) -> Self {
        let excerpt = source
            .get(offset..)
            .unwrap_or_default()
            .chars()
            .take(Self::EXCERPT_CHARS)
            .collect();
        ScanError {
            offset,
            position,
            excerpt,
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: no terminal matches input at byte {} ({:?})",
            self.position, self.offset, self.excerpt
        )
    }
}

impl std::error::Error for ScanError {}

/// Failure of a parse invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Scan(ScanError),
    /// The requested start production is not part of the grammar
    UnknownProduction { name: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Scan(err) => write!(f, "scan error: {err}"),
            ParseError::UnknownProduction { name } => {
                write!(f, "grammar has no production named '{name}'")
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Scan(err) => Some(err),
            ParseError::UnknownProduction { .. } => None,
        }
    }
}

impl From<ScanError> for ParseError {
    fn from(err: ScanError) -> Self {
        ParseError::Scan(err)
    }
}

/// Any error of a compile-then-parse call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Structural(StructuralError),
    Parse(ParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Structural(err) => write!(f, "grammar error: {err}"),
            Error::Parse(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Structural(err) => Some(err),
            Error::Parse(err) => Some(err),
        }
    }
}

impl From<StructuralError> for Error {
    fn from(err: StructuralError) -> Self {
        Error::Structural(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<ScanError> for Error {
    fn from(err: ScanError) -> Self {
        Error::Parse(ParseError::Scan(err))
    }
}
