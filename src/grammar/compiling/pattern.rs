//! Pattern trees shared by terminals and productions
//!
//!     One [Pattern] type describes every right-hand side: the bodies of `token` and `skip`
//!     rules, the bodies of productions, and the restricted regexes found between
//!     backticks. Terminal bodies and regex bodies are matched against characters by the
//!     scanner; production bodies are matched against tokens by the engine.
//!
//!     Names start out as [Pattern::Name] and are replaced by [Pattern::Terminal] or
//!     [Pattern::Production] once every statement has been read, so references are plain
//!     indices into the grammar's tables and cyclic grammars need no shared ownership.

use crate::grammar::location::Position;
use crate::grammar::token::TokenKind;
use serde::Serialize;
use std::fmt;

/// Index of a terminal in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TerminalId(pub usize);

/// Index of a production in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProductionId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quantifier {
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

/// A set of characters given as inclusive ranges, written `{a-z_}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CharClass {
    ranges: Vec<(char, char)>,
}

impl CharClass {
    pub fn new(ranges: Vec<(char, char)>) -> Self {
        CharClass { ranges }
    }

    pub fn contains(&self, c: char) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
    }

    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }
}

/// A compiled backtick pattern. The source is kept for display and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Regex {
    source: String,
    body: Box<Pattern>,
}

impl Regex {
    pub(crate) fn new(source: String, body: Pattern) -> Self {
        Regex {
            source,
            body: Box::new(body),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn body(&self) -> &Pattern {
        &self.body
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Pattern {
    /// Exact text
    Literal(String),
    /// A backtick pattern; matches whole text when used in a production
    Regex(Regex),
    /// `.` inside a regex: any single character
    Any,
    /// `{...}` inside a regex
    Class(CharClass),
    /// A reference not yet resolved
    Name(String),
    Terminal(TerminalId),
    Production(ProductionId),
    Sequence(Vec<Pattern>),
    Alternation(Vec<Pattern>),
    /// `( ... )`
    Group(Box<Pattern>),
    Repeat(Box<Pattern>, Quantifier),
    /// `[ ... ]`
    Optional(Box<Pattern>),
    /// `~x`: one unit that does not match `x`
    Negation(Box<Pattern>),
}

impl Pattern {
    pub(crate) fn sequence(mut items: Vec<Pattern>) -> Pattern {
        if items.len() == 1 {
            items.pop().unwrap_or(Pattern::Sequence(Vec::new()))
        } else {
            Pattern::Sequence(items)
        }
    }

    /// Like [Pattern::sequence], for character-level patterns: runs of single
    /// characters merge into one literal.
    pub(crate) fn text_sequence(items: Vec<Pattern>) -> Pattern {
        let mut merged: Vec<Pattern> = Vec::with_capacity(items.len());
        for item in items {
            match (merged.last_mut(), item) {
                (Some(Pattern::Literal(prev)), Pattern::Literal(next)) => prev.push_str(&next),
                (_, item) => merged.push(item),
            }
        }
        Pattern::sequence(merged)
    }

    pub(crate) fn alternation(mut alternatives: Vec<Pattern>) -> Pattern {
        if alternatives.len() == 1 {
            alternatives.pop().unwrap_or(Pattern::Alternation(Vec::new()))
        } else {
            Pattern::Alternation(alternatives)
        }
    }

    /// Direct sub-patterns. A regex is a leaf: its body is text-level and never
    /// holds references.
    pub fn children(&self) -> Vec<&Pattern> {
        match self {
            Pattern::Sequence(items) | Pattern::Alternation(items) => items.iter().collect(),
            Pattern::Group(inner)
            | Pattern::Repeat(inner, _)
            | Pattern::Optional(inner)
            | Pattern::Negation(inner) => vec![inner.as_ref()],
            Pattern::Literal(_)
            | Pattern::Regex(_)
            | Pattern::Any
            | Pattern::Class(_)
            | Pattern::Name(_)
            | Pattern::Terminal(_)
            | Pattern::Production(_) => Vec::new(),
        }
    }

    /// Pre-order traversal.
    pub fn walk<'p>(&'p self, visit: &mut impl FnMut(&'p Pattern)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Rewrite every [Pattern::Name] in place. The first error stops the rewrite.
    pub(crate) fn resolve<E>(
        &mut self,
        lookup: &mut impl FnMut(&str) -> Result<Pattern, E>,
    ) -> Result<(), E> {
        match self {
            Pattern::Name(name) => {
                let resolved = lookup(name)?;
                *self = resolved;
                Ok(())
            }
            Pattern::Sequence(items) | Pattern::Alternation(items) => {
                for item in items {
                    item.resolve(lookup)?;
                }
                Ok(())
            }
            Pattern::Group(inner)
            | Pattern::Repeat(inner, _)
            | Pattern::Optional(inner)
            | Pattern::Negation(inner) => inner.resolve(lookup),
            Pattern::Literal(_)
            | Pattern::Regex(_)
            | Pattern::Any
            | Pattern::Class(_)
            | Pattern::Terminal(_)
            | Pattern::Production(_) => Ok(()),
        }
    }

    /// Terminals referenced anywhere below this pattern.
    pub fn terminal_refs(&self) -> Vec<TerminalId> {
        let mut refs = Vec::new();
        self.walk(&mut |pattern| {
            if let Pattern::Terminal(id) = pattern {
                refs.push(*id);
            }
        });
        refs
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "\"{text}\"")
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(text) => write_quoted(f, text),
            Pattern::Regex(regex) => write!(f, "`{}`", regex.source()),
            Pattern::Any => f.write_str("."),
            Pattern::Class(class) => {
                f.write_str("{")?;
                for &(lo, hi) in class.ranges() {
                    if lo == hi {
                        write!(f, "{}", lo.escape_debug())?;
                    } else {
                        write!(f, "{}-{}", lo.escape_debug(), hi.escape_debug())?;
                    }
                }
                f.write_str("}")
            }
            Pattern::Name(name) => f.write_str(name),
            Pattern::Terminal(id) => write!(f, "#t{}", id.0),
            Pattern::Production(id) => write!(f, "#p{}", id.0),
            Pattern::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Pattern::Alternation(alternatives) => {
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{alternative}")?;
                }
                Ok(())
            }
            Pattern::Group(inner) => write!(f, "({inner})"),
            Pattern::Repeat(inner, Quantifier::ZeroOrMore) => write!(f, "{inner}*"),
            Pattern::Repeat(inner, Quantifier::OneOrMore) => write!(f, "{inner}+"),
            Pattern::Optional(inner) => write!(f, "[{inner}]"),
            Pattern::Negation(inner) => write!(f, "~{inner}"),
        }
    }
}

/// How a terminal came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminalOrigin {
    /// A `token` statement
    Declared,
    /// A `skip` statement; matches are discarded
    Skip,
    /// A literal or backtick pattern written directly in a production
    Implicit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerminalDef {
    /// `None` for skip rules
    pub name: Option<String>,
    pub pattern: Pattern,
    pub kind: Option<TokenKind>,
    pub origin: TerminalOrigin,
    pub position: Position,
}

impl TerminalDef {
    pub fn is_skip(&self) -> bool {
        self.origin == TerminalOrigin::Skip
    }

    /// The name, or `<skip>` for anonymous skip rules.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<skip>")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionDef {
    pub name: String,
    pub pattern: Pattern,
    pub position: Position,
}
