//! Grammar compilation
//!
//!     compile(description)
//!       lexing::tokenize          logos meta-lexer, byte spans
//!       lexing::split_statements  bracket-aware statement boundaries
//!       statements                chumsky statement parser, one statement at a time
//!       builder                   implicit terminals, name resolution, cycle checks
//!
//!     The result is a [CompiledGrammar]: an ordered terminal table (declaration order is
//!     the scanner's tie-break) and a production table addressed by [ProductionId], with
//!     a name index for lookups. A compiled grammar is immutable; every parse borrows it.

pub mod builder;
pub mod pattern;
pub mod regex;
pub mod statements;

pub use pattern::{
    CharClass, Pattern, ProductionDef, ProductionId, Quantifier, Regex, TerminalDef, TerminalId,
    TerminalOrigin,
};

use crate::grammar::errors::StructuralError;
use crate::grammar::lexing;
use crate::grammar::location::SourceLocation;
use crate::grammar::token::KeywordTable;
use builder::GrammarBuilder;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Terminal and production tables produced from one grammar description
#[derive(Debug, Clone, Serialize)]
pub struct CompiledGrammar {
    terminals: Vec<TerminalDef>,
    productions: Vec<ProductionDef>,
    #[serde(skip)]
    production_index: HashMap<String, ProductionId>,
    #[serde(skip)]
    terminal_index: HashMap<String, TerminalId>,
    #[serde(skip)]
    keywords: KeywordTable,
}

impl CompiledGrammar {
    /// All terminals in scanner priority order: declared and skip rules as written, then
    /// implicit terminals.
    pub fn terminals(&self) -> &[TerminalDef] {
        &self.terminals
    }

    pub fn terminal(&self, id: TerminalId) -> Option<&TerminalDef> {
        self.terminals.get(id.0)
    }

    pub fn terminal_id(&self, name: &str) -> Option<TerminalId> {
        self.terminal_index.get(name).copied()
    }

    /// Productions in declaration order
    pub fn productions(&self) -> &[ProductionDef] {
        &self.productions
    }

    pub fn production(&self, id: ProductionId) -> Option<&ProductionDef> {
        self.productions.get(id.0)
    }

    pub fn production_id(&self, name: &str) -> Option<ProductionId> {
        self.production_index.get(name).copied()
    }

    pub fn production_by_name(&self, name: &str) -> Option<&ProductionDef> {
        self.production_id(name).and_then(|id| self.production(id))
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }
}

/// Compile a grammar description. The first error aborts compilation.
pub fn compile(description: &str) -> Result<CompiledGrammar, StructuralError> {
    let locator = SourceLocation::new(description);
    let tokens = lexing::tokenize(description)?;
    let split = lexing::split_statements(description, tokens)?;
    debug!(
        "compiling {} statements over {} lines",
        split.len(),
        locator.line_count()
    );

    let mut builder = GrammarBuilder::new();
    for statement in split {
        let position = locator.byte_to_position(statement.span.start);
        let parsed = statements::parse_statement(&locator, statement)?;
        builder.add(parsed, position)?;
    }

    let grammar = builder.finish()?;
    debug!(
        "compiled grammar: {} terminals, {} productions",
        grammar.terminals.len(),
        grammar.productions.len()
    );
    Ok(grammar)
}
