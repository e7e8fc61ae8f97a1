//! Assembly of parsed statements into a grammar
//!
//!     Statements are added one at a time in description order. Only when the whole
//!     description has been read does [GrammarBuilder::finish] add implicit terminals,
//!     resolve names to table indices and check terminal references for cycles, so
//!     references may appear before the statement that defines them.

use super::pattern::{
    Pattern, ProductionDef, ProductionId, TerminalDef, TerminalId, TerminalOrigin,
};
use super::statements::Statement;
use super::CompiledGrammar;
use crate::grammar::errors::StructuralError;
use crate::grammar::location::Position;
use crate::grammar::token::{KeywordTable, TokenKind};
use log::trace;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct GrammarBuilder {
    terminals: Vec<TerminalDef>,
    productions: Vec<ProductionDef>,
    defined: HashMap<String, Position>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, statement: Statement, position: Position) -> Result<(), StructuralError> {
        match statement {
            Statement::Token { name, pattern } => {
                self.define(&name, position)?;
                let kind = classify(&name, &pattern);
                self.terminals.push(TerminalDef {
                    name: Some(name),
                    pattern,
                    kind,
                    origin: TerminalOrigin::Declared,
                    position,
                });
            }
            Statement::Skip { pattern } => self.terminals.push(TerminalDef {
                name: None,
                pattern,
                kind: None,
                origin: TerminalOrigin::Skip,
                position,
            }),
            Statement::Production { name, pattern } => {
                self.define(&name, position)?;
                self.productions.push(ProductionDef {
                    name,
                    pattern,
                    position,
                });
            }
        }
        Ok(())
    }

    fn define(&mut self, name: &str, position: Position) -> Result<(), StructuralError> {
        if self.defined.contains_key(name) {
            return Err(StructuralError::DuplicateDefinition {
                position,
                name: name.to_string(),
            });
        }
        self.defined.insert(name.to_string(), position);
        Ok(())
    }

    pub fn finish(mut self) -> Result<CompiledGrammar, StructuralError> {
        self.add_implicit_terminals();

        let terminal_index: HashMap<String, TerminalId> = self
            .terminals
            .iter()
            .enumerate()
            .filter_map(|(i, def)| def.name.clone().map(|name| (name, TerminalId(i))))
            .collect();
        let production_index: HashMap<String, ProductionId> = self
            .productions
            .iter()
            .enumerate()
            .map(|(i, def)| (def.name.clone(), ProductionId(i)))
            .collect();

        for def in &mut self.terminals {
            let position = def.position;
            def.pattern.resolve(&mut |name| {
                if let Some(id) = terminal_index.get(name) {
                    Ok(Pattern::Terminal(*id))
                } else if production_index.contains_key(name) {
                    Err(StructuralError::ProductionInTerminal {
                        position,
                        name: name.to_string(),
                    })
                } else {
                    Err(StructuralError::UndefinedReference {
                        position,
                        name: name.to_string(),
                    })
                }
            })?;
        }

        for def in &mut self.productions {
            let position = def.position;
            def.pattern.resolve(&mut |name| {
                if let Some(id) = terminal_index.get(name) {
                    Ok(Pattern::Terminal(*id))
                } else if let Some(id) = production_index.get(name) {
                    Ok(Pattern::Production(*id))
                } else {
                    Err(StructuralError::UndefinedReference {
                        position,
                        name: name.to_string(),
                    })
                }
            })?;
        }

        check_terminal_cycles(&self.terminals)?;

        Ok(CompiledGrammar {
            terminals: self.terminals,
            productions: self.productions,
            production_index,
            terminal_index,
            keywords: KeywordTable::new(),
        })
    }

    /// Literals and backtick patterns used in productions need a terminal to be
    /// scanned at all. Declared terminals with the same exact pattern already cover them.
    fn add_implicit_terminals(&mut self) {
        let mut implicit: Vec<(Pattern, Position)> = Vec::new();
        let declared = &self.terminals;

        for production in &self.productions {
            production.pattern.walk(&mut |pattern| {
                if !matches!(pattern, Pattern::Literal(_) | Pattern::Regex(_)) {
                    return;
                }
                let covered = declared
                    .iter()
                    .any(|def| def.origin == TerminalOrigin::Declared && def.pattern == *pattern);
                if !covered && !implicit.iter().any(|(seen, _)| seen == pattern) {
                    implicit.push((pattern.clone(), production.position));
                }
            });
        }

        for (pattern, position) in implicit {
            let (name, kind) = match &pattern {
                Pattern::Literal(text) => (format!("\"{text}\""), TokenKind::from_spelling(text)),
                other => (other.to_string(), None),
            };
            trace!("implicit terminal {name}");
            self.terminals.push(TerminalDef {
                name: Some(name),
                pattern,
                kind,
                origin: TerminalOrigin::Implicit,
                position,
            });
        }
    }
}

fn classify(name: &str, pattern: &Pattern) -> Option<TokenKind> {
    TokenKind::from_terminal_name(name).or_else(|| match pattern {
        Pattern::Literal(text) => TokenKind::from_spelling(text),
        _ => None,
    })
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

fn check_terminal_cycles(terminals: &[TerminalDef]) -> Result<(), StructuralError> {
    let mut marks = vec![Mark::Unvisited; terminals.len()];
    for start in 0..terminals.len() {
        visit(terminals, start, &mut marks)?;
    }
    Ok(())
}

fn visit(terminals: &[TerminalDef], index: usize, marks: &mut [Mark]) -> Result<(), StructuralError> {
    match marks[index] {
        Mark::Done => return Ok(()),
        Mark::InProgress => {
            let def = &terminals[index];
            return Err(StructuralError::RecursiveTerminal {
                position: def.position,
                name: def.display_name().to_string(),
            });
        }
        Mark::Unvisited => {}
    }
    marks[index] = Mark::InProgress;
    for TerminalId(next) in terminals[index].pattern.terminal_refs() {
        visit(terminals, next, marks)?;
    }
    marks[index] = Mark::Done;
    Ok(())
}
