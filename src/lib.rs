//! # metagram
//!
//! A grammar description language that tokenizes and parses itself.
//!
//! File Layout
//!
//!     The crate is a single umbrella module, [grammar], split by pipeline stage:
//!
//!     src/grammar
//!       ├── token        Token kinds, precedence and the keyword table
//!       ├── lexing       The logos lexer for grammar descriptions and statement splitting
//!       ├── compiling    Statement parser, restricted regexes, reference resolution
//!       ├── scanning     Longest-match tokenizer driven by a compiled grammar
//!       ├── parsing      Recursive descent engine and syntax trees
//!       └── formats      Tree serialization for downstream tools
//!
//!     A compiled grammar is immutable and can be shared between threads. Every parse
//!     owns its own token buffer and tree.
//!
//! Entry Points
//!
//!     compile(description) -> CompiledGrammar | StructuralError
//!     parse(&grammar, start, input) -> ParseOutcome | ParseError
//!
//! The bootstrap grammar (the description language written in itself) is available via
//! [bootstrap].

pub mod grammar;

pub use grammar::api::{compile, parse, parse_bytes, parse_with_config};
pub use grammar::bootstrap::{bootstrap, BOOTSTRAP_GRAMMAR};
pub use grammar::compiling::CompiledGrammar;
pub use grammar::config::ParseConfig;
pub use grammar::errors::{Error, ParseError, ScanError, StructuralError};
pub use grammar::formats::{Format, FormatError, FormatOptions};
pub use grammar::parsing::{Capture, ParseOutcome, SyntaxNode};
pub use grammar::scanning::{tokenize, Scanner, Token};
pub use grammar::token::{KeywordTable, Precedence, TokenKind};
