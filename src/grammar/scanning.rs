//! Scanning input with a compiled grammar
//!
//!     At each offset every terminal, skip rules included, is matched against the rest of
//!     the input. The longest match wins; on equal length the terminal declared first
//!     wins. Skip matches are dropped and scanning resumes after them. There is no
//!     backtracking across tokens: once selected, a token is final.
//!
//!     The [Scanner] is lazy. It yields tokens, then exactly one end-of-input token, then
//!     nothing. When no terminal matches it yields a [ScanError] once and stops.
//!
//!     Identifier-shaped terminals (kind [TokenKind::Ident]) are looked up in the
//!     grammar's keyword table, so `if` scanned by an `ID` terminal comes out as
//!     [TokenKind::If].

mod matcher;

pub(crate) use matcher::Matcher;

use crate::grammar::compiling::{CompiledGrammar, TerminalId};
use crate::grammar::config::ParseConfig;
use crate::grammar::errors::ScanError;
use crate::grammar::location::{Position, SourceLocation};
use crate::grammar::token::TokenKind;
use log::trace;
use std::ops::Range;

/// One scanned token, borrowing its text from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The terminal that produced the token; `None` only for end of input
    pub terminal: Option<TerminalId>,
    pub kind: Option<TokenKind>,
    pub text: &'src str,
    pub span: Range<usize>,
    pub position: Position,
}

impl<'src> Token<'src> {
    pub fn is_eof(&self) -> bool {
        self.terminal.is_none()
    }
}

pub struct Scanner<'g, 'src> {
    grammar: &'g CompiledGrammar,
    source: &'src str,
    locator: SourceLocation,
    offset: usize,
    classify_keywords: bool,
    finished: bool,
}

impl<'g, 'src> Scanner<'g, 'src> {
    pub fn new(grammar: &'g CompiledGrammar, source: &'src str) -> Self {
        Self::with_config(grammar, source, &ParseConfig::default())
    }

    pub fn with_config(grammar: &'g CompiledGrammar, source: &'src str, config: &ParseConfig) -> Self {
        Scanner {
            grammar,
            source,
            locator: SourceLocation::new(source),
            offset: 0,
            classify_keywords: config.classify_keywords,
            finished: false,
        }
    }

    /// The end-of-input token for this source.
    pub fn end_of_input(&self) -> Token<'src> {
        let end = self.source.len();
        Token {
            terminal: None,
            kind: Some(TokenKind::Eof),
            text: &self.source[end..],
            span: end..end,
            position: self.locator.byte_to_position(end),
        }
    }

    /// The winning terminal at the current offset and its match length.
    fn select(&self) -> Option<(TerminalId, usize)> {
        let matcher = Matcher::new(self.grammar.terminals(), self.source);
        let mut best: Option<(TerminalId, usize)> = None;

        for (index, def) in self.grammar.terminals().iter().enumerate() {
            if let Some(length) = matcher.longest(&def.pattern, self.offset) {
                if best.map_or(true, |(_, best_length)| length > best_length) {
                    best = Some((TerminalId(index), length));
                }
            }
        }

        best
    }

    fn classify(&self, kind: Option<TokenKind>, text: &str) -> Option<TokenKind> {
        match kind {
            Some(TokenKind::Ident) if self.classify_keywords => {
                Some(self.grammar.keywords().classify(text))
            }
            other => other,
        }
    }
}

impl<'g, 'src> Iterator for Scanner<'g, 'src> {
    type Item = Result<Token<'src>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if self.offset >= self.source.len() {
                self.finished = true;
                return Some(Ok(self.end_of_input()));
            }

            let position = self.locator.byte_to_position(self.offset);
            let Some((id, length)) = self.select() else {
                self.finished = true;
                return Some(Err(ScanError::unmatched(self.source, self.offset, position)));
            };
            let Some(def) = self.grammar.terminal(id) else {
                self.finished = true;
                return Some(Err(ScanError::unmatched(self.source, self.offset, position)));
            };

            let span = self.offset..self.offset + length;
            self.offset = span.end;
            let text = &self.source[span.clone()];

            if def.is_skip() {
                trace!("skip {:?} at {position}", text);
                continue;
            }

            trace!("{} {:?} at {position}", def.display_name(), text);
            return Some(Ok(Token {
                terminal: Some(id),
                kind: self.classify(def.kind, text),
                text,
                span,
                position,
            }));
        }
    }
}

/// Scan the whole input. The last token is always end of input.
pub fn tokenize<'src>(
    grammar: &CompiledGrammar,
    input: &'src str,
) -> Result<Vec<Token<'src>>, ScanError> {
    Scanner::new(grammar, input).collect()
}
