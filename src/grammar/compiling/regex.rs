//! The restricted regex dialect used between backticks
//!
//! Syntax
//!
//!     The dialect reuses the grammar operators and adds two character-level atoms:
//!
//!         x y       sequence              x | y     alternation
//!         ( x )     grouping              [ x ]     optional
//!         x*  x+    repetition            ~x        one character not matching x
//!         .         any character         {a-z_}    character class (ranges and singles)
//!
//!     Every other character stands for itself. A backslash escapes a metacharacter
//!     (`\(`, `\|`, `\{`, `\-`, ...) or introduces one of `\n \r \t \b \f \0 \\` and
//!     `` \` ``. Any other escape is rejected. Patterns are anchored at the scan
//!     position and report every reachable end; the scanner keeps the longest.
//!
//!     There are no counted repetitions, anchors, back-references or lookaround.

use super::pattern::{CharClass, Pattern, Quantifier, Regex};
use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use std::fmt;
use std::hash::Hash;

/// Characters that need a backslash to stand for themselves outside a class
const META: &[char] = &['\\', '(', ')', '[', ']', '{', '}', '|', '*', '+', '~', '.'];

/// A rejected backtick pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    /// Byte offset into the pattern source
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.offset)
    }
}

/// Compile the text found between backticks.
pub fn compile(source: &str) -> Result<Regex, PatternError> {
    match parser().parse(source) {
        Ok(body) => Ok(Regex::new(source.to_string(), body)),
        Err(errors) => {
            let err = errors.into_iter().next();
            let (char_index, message) = match err {
                Some(err) => (err.span().start, describe(&err)),
                None => (0, "malformed pattern".to_string()),
            };
            let offset = source
                .char_indices()
                .nth(char_index)
                .map(|(offset, _)| offset)
                .unwrap_or(source.len());
            Err(PatternError { offset, message })
        }
    }
}

/// Render a chumsky error the way every compiler diagnostic reads.
pub(crate) fn describe<T: fmt::Display + Hash + Eq>(err: &Simple<T>) -> String {
    match err.reason() {
        SimpleReason::Custom(message) => message.clone(),
        SimpleReason::Unclosed { delimiter, .. } => format!("unclosed {delimiter}"),
        SimpleReason::Unexpected => match err.found() {
            Some(found) => format!("unexpected {found}"),
            None => "unexpected end of pattern".to_string(),
        },
    }
}

fn escape() -> impl Parser<char, char, Error = Simple<char>> + Clone {
    just('\\')
        .ignore_then(any())
        .try_map(|c: char, span| match c {
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'b' => Ok('\u{8}'),
            'f' => Ok('\u{c}'),
            '0' => Ok('\0'),
            '`' | '-' => Ok(c),
            c if META.contains(&c) => Ok(c),
            other => Err(Simple::custom(span, format!("unknown escape \\{other}"))),
        })
}

fn class() -> impl Parser<char, Pattern, Error = Simple<char>> + Clone {
    let member = escape().or(filter(|c: &char| !matches!(c, '}' | '\\' | '-')));

    member
        .clone()
        .then(just('-').ignore_then(member).or_not())
        .try_map(|(lo, hi), span| {
            let hi = hi.unwrap_or(lo);
            if hi < lo {
                Err(Simple::custom(span, format!("empty range {lo}-{hi}")))
            } else {
                Ok((lo, hi))
            }
        })
        .repeated()
        .at_least(1)
        .delimited_by(just('{'), just('}'))
        .map(|ranges| Pattern::Class(CharClass::new(ranges)))
}

fn parser() -> impl Parser<char, Pattern, Error = Simple<char>> {
    recursive(|alternation| {
        let literal = escape()
            .or(filter(|c: &char| !META.contains(c)))
            .map(|c| Pattern::Literal(c.to_string()));

        let primary = choice((
            literal,
            just('.').to(Pattern::Any),
            class(),
            alternation
                .clone()
                .delimited_by(just('('), just(')'))
                .map(|inner| Pattern::Group(Box::new(inner))),
            alternation
                .delimited_by(just('['), just(']'))
                .map(|inner| Pattern::Optional(Box::new(inner))),
        ));

        let unary = just('~')
            .or_not()
            .then(primary)
            .map(|(tilde, inner)| match tilde {
                Some(_) => Pattern::Negation(Box::new(inner)),
                None => inner,
            });

        let quantifier = just('*')
            .to(Quantifier::ZeroOrMore)
            .or(just('+').to(Quantifier::OneOrMore));

        let quantified = unary
            .then(quantifier.or_not())
            .map(|(inner, quantifier)| match quantifier {
                Some(q) => Pattern::Repeat(Box::new(inner), q),
                None => inner,
            });

        quantified
            .repeated()
            .at_least(1)
            .map(Pattern::text_sequence)
            .separated_by(just('|'))
            .at_least(1)
            .map(Pattern::alternation)
    })
    .then_ignore(end())
}
