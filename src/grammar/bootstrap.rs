//! The description language written in itself
//!
//! [BOOTSTRAP_GRAMMAR] describes the statement forms, expressions and layout rules that
//! [compile](crate::grammar::compiling::compile) accepts, including the skip rules for
//! whitespace and comments. Compiled once on first use, it parses any grammar
//! description, its own text included, from the `grammar` production.

use crate::grammar::compiling::{compile, CompiledGrammar};
use crate::grammar::errors::StructuralError;
use once_cell::sync::Lazy;

pub const BOOTSTRAP_GRAMMAR: &str = include_str!("bootstrap.grammar");

/// Start production of the bootstrap grammar
pub const START: &str = "grammar";

static BOOTSTRAP: Lazy<Result<CompiledGrammar, StructuralError>> =
    Lazy::new(|| compile(BOOTSTRAP_GRAMMAR));

pub fn bootstrap() -> Result<&'static CompiledGrammar, StructuralError> {
    BOOTSTRAP.as_ref().map_err(Clone::clone)
}
