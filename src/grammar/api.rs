//! Entry points
//!
//! [compile] turns a grammar description into a [CompiledGrammar]. [parse] applies one of
//! its productions to an input. Non-acceptance is part of the [ParseOutcome]; only scan
//! failures and unknown start productions are errors.

use crate::grammar::compiling::{self, CompiledGrammar};
use crate::grammar::config::ParseConfig;
use crate::grammar::errors::{ParseError, ScanError, StructuralError};
use crate::grammar::location::SourceLocation;
use crate::grammar::parsing::{Engine, ParseOutcome, TokenStream};
use crate::grammar::scanning::Scanner;
use log::debug;

pub fn compile(description: &str) -> Result<CompiledGrammar, StructuralError> {
    compiling::compile(description)
}

/// Parse `input` from the production named `start` with the default configuration.
pub fn parse(
    grammar: &CompiledGrammar,
    start: &str,
    input: &str,
) -> Result<ParseOutcome, ParseError> {
    parse_with_config(grammar, start, input, &ParseConfig::default())
}

pub fn parse_with_config(
    grammar: &CompiledGrammar,
    start: &str,
    input: &str,
    config: &ParseConfig,
) -> Result<ParseOutcome, ParseError> {
    let start_id = grammar
        .production_id(start)
        .ok_or_else(|| ParseError::UnknownProduction {
            name: start.to_string(),
        })?;

    let stream = TokenStream::new(Scanner::with_config(grammar, input, config));
    let outcome = Engine::new(grammar, input, stream, config).run(start_id)?;
    debug!(
        "parsed '{start}': accepted={} consumed={} tokens truncated={}",
        outcome.accepted, outcome.consumed, outcome.truncated
    );
    Ok(outcome)
}

/// Parse raw bytes. Bytes that are not UTF-8 fail like unmatched input, at the first
/// invalid byte.
pub fn parse_bytes(
    grammar: &CompiledGrammar,
    start: &str,
    input: &[u8],
) -> Result<ParseOutcome, ParseError> {
    match std::str::from_utf8(input) {
        Ok(text) => parse(grammar, start, text),
        Err(err) => {
            let valid = &input[..err.valid_up_to()];
            // The prefix up to valid_up_to is UTF-8 by construction
            let prefix = std::str::from_utf8(valid).unwrap_or_default();
            let position = SourceLocation::new(prefix).byte_to_position(prefix.len());
            let excerpt = String::from_utf8_lossy(&input[err.valid_up_to()..])
                .chars()
                .take(16)
                .collect();
            Err(ParseError::Scan(ScanError {
                offset: err.valid_up_to(),
                position,
                excerpt,
            }))
        }
    }
}
