//! Lexing of grammar descriptions
//!
//!     A grammar description is line oriented. The logos lexer below turns it into
//!     [MetaToken]s with byte ranges, dropping layout (spaces, tabs, backspaces, form feeds)
//!     and `//` comments but keeping newlines, which end statements.
//!
//! Statement Splitting
//!
//!     [split_statements] groups the token stream into statements. A newline ends the
//!     current statement only while no `(` or `[` is open; inside a group it is layout, so
//!     a single statement may span several lines:
//!
//!         expr ::= term (
//!             "+" term
//!           | "-" term
//!         )*
//!
//!     Brackets are checked while splitting: a closer that does not match the innermost
//!     opener, or an opener still open at the end of the description, is a structural error.

use crate::grammar::errors::StructuralError;
use crate::grammar::location::SourceLocation;
use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Tokens of the grammar description language
#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"([ \t\x08\x0c]+|//[^\n]*)")]
pub enum MetaToken {
    #[token("token")]
    Token,

    #[token("skip")]
    Skip,

    #[token("::=")]
    Define,

    #[token("|")]
    Pipe,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("~")]
    Tilde,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Name(String),

    /// Exact text between double quotes, quotes removed
    #[regex(r#""[^"\n]*""#, unquote)]
    Literal(String),

    /// Restricted regex source between backticks, backticks removed, escapes kept
    #[regex(r"`([^`\\\n]|\\[^\n])*`", unquote)]
    Regex(String),
}

fn unquote(lex: &mut logos::Lexer<MetaToken>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

impl fmt::Display for MetaToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaToken::Token => f.write_str("'token'"),
            MetaToken::Skip => f.write_str("'skip'"),
            MetaToken::Define => f.write_str("'::='"),
            MetaToken::Pipe => f.write_str("'|'"),
            MetaToken::LParen => f.write_str("'('"),
            MetaToken::RParen => f.write_str("')'"),
            MetaToken::LBracket => f.write_str("'['"),
            MetaToken::RBracket => f.write_str("']'"),
            MetaToken::Star => f.write_str("'*'"),
            MetaToken::Plus => f.write_str("'+'"),
            MetaToken::Tilde => f.write_str("'~'"),
            MetaToken::Newline => f.write_str("line break"),
            MetaToken::Name(name) => write!(f, "name '{name}'"),
            MetaToken::Literal(text) => write!(f, "literal \"{text}\""),
            MetaToken::Regex(source) => write!(f, "pattern `{source}`"),
        }
    }
}

/// A token paired with its byte range in the description
pub type SpannedToken = (MetaToken, Range<usize>);

/// The tokens of one statement, newlines removed
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTokens {
    pub tokens: Vec<SpannedToken>,
    /// From the first token's start to the last token's end
    pub span: Range<usize>,
}

/// Tokenize a whole description.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, StructuralError> {
    let mut tokens = Vec::new();

    for (result, span) in MetaToken::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let locator = SourceLocation::new(source);
                let found = source[span.start..].chars().next().unwrap_or('\0');
                return Err(StructuralError::UnexpectedCharacter {
                    position: locator.byte_to_position(span.start),
                    found,
                });
            }
        }
    }

    Ok(tokens)
}

/// Group tokens into statements, tracking bracket depth across line breaks.
pub fn split_statements(
    source: &str,
    tokens: Vec<SpannedToken>,
) -> Result<Vec<StatementTokens>, StructuralError> {
    let locator = SourceLocation::new(source);
    let mut statements = Vec::new();
    let mut current: Vec<SpannedToken> = Vec::new();
    let mut open: Vec<(char, usize)> = Vec::new();

    for (token, span) in tokens {
        match token {
            MetaToken::Newline if open.is_empty() => {
                flush(&mut current, &mut statements);
                continue;
            }
            MetaToken::Newline => continue,
            MetaToken::LParen => open.push(('(', span.start)),
            MetaToken::LBracket => open.push(('[', span.start)),
            MetaToken::RParen | MetaToken::RBracket => {
                let (closer, opener) = if token == MetaToken::RParen {
                    (')', '(')
                } else {
                    (']', '[')
                };
                match open.pop() {
                    Some((found, _)) if found == opener => {}
                    _ => {
                        return Err(StructuralError::UnbalancedGroup {
                            position: locator.byte_to_position(span.start),
                            delimiter: closer,
                        })
                    }
                }
            }
            _ => {}
        }
        current.push((token, span));
    }

    if let Some((delimiter, offset)) = open.pop() {
        return Err(StructuralError::UnclosedGroup {
            position: locator.byte_to_position(offset),
            delimiter,
        });
    }

    flush(&mut current, &mut statements);
    Ok(statements)
}

fn flush(current: &mut Vec<SpannedToken>, statements: &mut Vec<StatementTokens>) {
    if current.is_empty() {
        return;
    }
    let tokens = std::mem::take(current);
    let start = tokens.first().map(|(_, span)| span.start).unwrap_or(0);
    let end = tokens.last().map(|(_, span)| span.end).unwrap_or(start);
    statements.push(StatementTokens {
        tokens,
        span: start..end,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::location::Position;

    fn kinds(source: &str) -> Vec<MetaToken> {
        tokenize(source)
            .expect("description should tokenize")
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_tokenize_statement_forms() {
        assert_eq!(
            kinds("token digit `{0-9}`\nskip \" \"\nnum ::= digit+ // trailing"),
            vec![
                MetaToken::Token,
                MetaToken::Name("digit".to_string()),
                MetaToken::Regex("{0-9}".to_string()),
                MetaToken::Newline,
                MetaToken::Skip,
                MetaToken::Literal(" ".to_string()),
                MetaToken::Newline,
                MetaToken::Name("num".to_string()),
                MetaToken::Define,
                MetaToken::Name("digit".to_string()),
                MetaToken::Plus,
            ]
        );
    }

    #[test]
    fn test_reserved_words_need_exact_spelling() {
        assert_eq!(
            kinds("tokens skipper token"),
            vec![
                MetaToken::Name("tokens".to_string()),
                MetaToken::Name("skipper".to_string()),
                MetaToken::Token,
            ]
        );
    }

    #[test]
    fn test_regex_keeps_escapes() {
        assert_eq!(
            kinds(r"token tick `\``"),
            vec![
                MetaToken::Token,
                MetaToken::Name("tick".to_string()),
                MetaToken::Regex(r"\`".to_string()),
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("a ::= b\n  c ::= $").unwrap_err();
        assert_eq!(
            err,
            StructuralError::UnexpectedCharacter {
                position: Position::new(1, 8),
                found: '$',
            }
        );
    }

    #[test]
    fn test_split_continues_inside_groups() {
        let source = "a ::= (\n  \"x\"\n | \"y\"\n)\n\nb ::= a [\n a ]\n";
        let statements = split_statements(source, tokenize(source).unwrap()).unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].tokens.len(), 7);
        assert_eq!(statements[1].tokens.len(), 6);
        assert_eq!(&source[statements[0].span.clone()], "a ::= (\n  \"x\"\n | \"y\"\n)");
    }

    #[test]
    fn test_split_reports_unclosed_opener() {
        let source = "a ::= \"x\"\nb ::= [ \"y\"\n";
        let err = split_statements(source, tokenize(source).unwrap()).unwrap_err();
        assert_eq!(
            err,
            StructuralError::UnclosedGroup {
                position: Position::new(1, 6),
                delimiter: '[',
            }
        );
    }

    #[test]
    fn test_split_reports_mismatched_closer() {
        let source = "a ::= ( \"x\" ]";
        let err = split_statements(source, tokenize(source).unwrap()).unwrap_err();
        assert_eq!(
            err,
            StructuralError::UnbalancedGroup {
                position: Position::new(0, 12),
                delimiter: ']',
            }
        );
    }
}
