//! Syntax trees produced by the engine
//!
//! A [SyntaxNode] is one successful production match. It records the production name,
//! where the match starts, the text it covers, the tokens the body consumed directly
//! (its captures) and the nodes of sub-productions that consumed at least one token.
//! Sub-production matches of zero tokens leave no child behind.
//!
//! Capture indices follow the usual convention: index 0 is the whole match, index `i`
//! is the `i`-th directly captured token.

use crate::grammar::location::Position;
use crate::grammar::token::TokenKind;
use serde::Serialize;
use std::ops::Range;

/// A token consumed directly by a production body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capture {
    /// Name of the terminal that produced the token
    pub terminal: String,
    pub kind: Option<TokenKind>,
    pub text: String,
    pub span: Range<usize>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxNode {
    pub(crate) name: String,
    pub(crate) position: Position,
    /// Byte range in the input
    pub(crate) span: Range<usize>,
    /// Range of token indices consumed
    pub(crate) tokens: Range<usize>,
    pub(crate) text: String,
    pub(crate) children: Vec<SyntaxNode>,
    pub(crate) captures: Vec<Capture>,
}

impl SyntaxNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn token_range(&self) -> Range<usize> {
        self.tokens.clone()
    }

    /// Number of tokens the match consumed, children included.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// The whole matched text, from the first token's start to the last token's end.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&SyntaxNode> {
        self.children.get(index)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SyntaxNode> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// First node named `name` in depth-first order, this node included.
    pub fn find(&self, name: &str) -> Option<&SyntaxNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }

    /// Captured text by index; 0 is the whole match.
    pub fn capture(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.text),
            i => self.captures.get(i - 1).map(|capture| capture.text.as_str()),
        }
    }

    /// Number of capture indices, including the whole match at 0.
    pub fn capture_count(&self) -> usize {
        self.captures.len() + 1
    }

    /// This node and all its descendants, depth-first.
    pub fn descendants(&self) -> Vec<&SyntaxNode> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.descendants());
        }
        nodes
    }
}
