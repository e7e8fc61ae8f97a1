//! Statement parser
//!
//!     Each statement produced by [split_statements](crate::grammar::lexing::split_statements)
//!     is parsed on its own with chumsky, over the [MetaToken] stream and its byte spans:
//!
//!         statement := "token" NAME expr | "skip" expr | NAME "::=" expr
//!         expr      := seq ("|" seq)*
//!         seq       := unary+
//!         unary     := ["~"] primary ["*" | "+"]
//!         primary   := NAME | LITERAL | REGEX | "(" expr ")" | "[" expr "]"
//!
//!     `~` binds to the primary and the quantifier to the (possibly negated) primary, so
//!     `~x*` repeats "anything but x".
//!
//!     Backtick patterns are compiled before the statement is parsed so that a bad
//!     pattern is reported as an invalid pattern at its own position, not as a malformed
//!     statement.

use super::pattern::{Pattern, Quantifier};
use super::regex::{self, describe};
use crate::grammar::errors::StructuralError;
use crate::grammar::lexing::{MetaToken, StatementTokens};
use crate::grammar::location::SourceLocation;
use chumsky::prelude::*;
use chumsky::Stream;
use std::ops::Range;

/// One parsed statement, names still unresolved
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Token { name: String, pattern: Pattern },
    Skip { pattern: Pattern },
    Production { name: String, pattern: Pattern },
}

type ParserError = Simple<MetaToken>;

pub fn parse_statement(
    locator: &SourceLocation,
    statement: StatementTokens,
) -> Result<Statement, StructuralError> {
    check_atoms(locator, &statement)?;

    let end = statement.span.end;
    let stream = Stream::from_iter(end..end, statement.tokens.into_iter());

    statement_parser().parse(stream).map_err(|errors| {
        let (offset, message) = match errors.into_iter().next() {
            Some(err) => (err.span().start, describe(&err)),
            None => (statement.span.start, "unrecognized statement".to_string()),
        };
        StructuralError::MalformedStatement {
            position: locator.byte_to_position(offset),
            message,
        }
    })
}

fn check_atoms(locator: &SourceLocation, statement: &StatementTokens) -> Result<(), StructuralError> {
    for (token, span) in &statement.tokens {
        match token {
            MetaToken::Literal(text) if text.is_empty() => {
                return Err(StructuralError::InvalidPattern {
                    position: locator.byte_to_position(span.start),
                    message: "empty literal".to_string(),
                });
            }
            MetaToken::Regex(source) => {
                if let Err(err) = regex::compile(source) {
                    // +1 skips the opening backtick
                    return Err(StructuralError::InvalidPattern {
                        position: locator.byte_to_position(span.start + 1 + err.offset),
                        message: err.message,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn expression() -> impl Parser<MetaToken, Pattern, Error = ParserError> + Clone {
    recursive(|expr| {
        let atom = select! {
            MetaToken::Name(name) => Pattern::Name(name),
            MetaToken::Literal(text) => Pattern::Literal(text),
        };

        let backtick = select! { MetaToken::Regex(source) => source }.try_map(
            |source, span: Range<usize>| {
                regex::compile(&source)
                    .map(Pattern::Regex)
                    .map_err(|err| Simple::custom(span, err.message))
            },
        );

        let primary = choice((
            atom,
            backtick,
            expr.clone()
                .delimited_by(just(MetaToken::LParen), just(MetaToken::RParen))
                .map(|inner| Pattern::Group(Box::new(inner))),
            expr.delimited_by(just(MetaToken::LBracket), just(MetaToken::RBracket))
                .map(|inner| Pattern::Optional(Box::new(inner))),
        ));

        let unary = just(MetaToken::Tilde)
            .or_not()
            .then(primary)
            .map(|(tilde, inner)| match tilde {
                Some(_) => Pattern::Negation(Box::new(inner)),
                None => inner,
            });

        let quantifier = just(MetaToken::Star)
            .to(Quantifier::ZeroOrMore)
            .or(just(MetaToken::Plus).to(Quantifier::OneOrMore));

        unary
            .then(quantifier.or_not())
            .map(|(inner, quantifier)| match quantifier {
                Some(q) => Pattern::Repeat(Box::new(inner), q),
                None => inner,
            })
            .repeated()
            .at_least(1)
            .map(Pattern::sequence)
            .separated_by(just(MetaToken::Pipe))
            .at_least(1)
            .map(Pattern::alternation)
    })
}

fn statement_parser() -> impl Parser<MetaToken, Statement, Error = ParserError> {
    let name = select! { MetaToken::Name(name) => name };

    let token = just(MetaToken::Token)
        .ignore_then(name.clone())
        .then(expression())
        .map(|(name, pattern)| Statement::Token { name, pattern });

    let skip = just(MetaToken::Skip)
        .ignore_then(expression())
        .map(|pattern| Statement::Skip { pattern });

    let production = name
        .then_ignore(just(MetaToken::Define))
        .then(expression())
        .map(|(name, pattern)| Statement::Production { name, pattern });

    choice((token, skip, production)).then_ignore(end())
}
