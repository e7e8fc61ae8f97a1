//! Token kinds, their bands and their canonical spelling.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// A lexical token kind.
///
/// The discriminants are contiguous per band (see [Band]); [TokenKind::ALL] lists every
/// kind in discriminant order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum TokenKind {
    Invalid,
    Eof,
    Comment,

    // Literals
    Ident,
    Integer,
    Rational,
    Char,
    String,

    // Arithmetic
    Plus,
    Minus,
    Splat,
    Slash,
    Percent,
    Caret,

    // Boolean
    BoolAnd,
    BoolOr,
    BoolEq,
    BoolNe,
    BoolLt,
    BoolGt,
    BoolLte,
    BoolGte,

    // Grouping
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Punctuation
    Ampersand,
    Tilde,
    Pipe,
    Comma,
    Period,
    Semicolon,
    Colon,
    Ellipsis,
    Question,
    Bang,

    // Assignment and types
    Equation,
    Typedef,
    Len,
    Arrow,
    Imply,

    // Reserved for future use
    At,
    Bling,

    // Domain keywords
    Env,
    Cell,
    User,
    Service,
    Component,
    Job,
    Storage,
    Mutable,

    BoolTrue,
    BoolFalse,

    // Control flow
    If,
    Else,
    Unless,
    Foreach,
    In,
    Contains,
}

/// The band a token kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Band {
    Control,
    Literal,
    Operator,
    Keyword,
}

const LITERAL_FIRST: u8 = TokenKind::Ident as u8;
const LITERAL_LAST: u8 = TokenKind::String as u8;
const OPERATOR_FIRST: u8 = TokenKind::Plus as u8;
const OPERATOR_LAST: u8 = TokenKind::Bling as u8;
const KEYWORD_FIRST: u8 = TokenKind::Env as u8;
const KEYWORD_LAST: u8 = TokenKind::Contains as u8;

impl TokenKind {
    /// Number of token kinds.
    pub const COUNT: usize = KEYWORD_LAST as usize + 1;

    /// Every kind, in discriminant order.
    pub const ALL: [TokenKind; TokenKind::COUNT] = [
        TokenKind::Invalid,
        TokenKind::Eof,
        TokenKind::Comment,
        TokenKind::Ident,
        TokenKind::Integer,
        TokenKind::Rational,
        TokenKind::Char,
        TokenKind::String,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Splat,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::Caret,
        TokenKind::BoolAnd,
        TokenKind::BoolOr,
        TokenKind::BoolEq,
        TokenKind::BoolNe,
        TokenKind::BoolLt,
        TokenKind::BoolGt,
        TokenKind::BoolLte,
        TokenKind::BoolGte,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LBrace,
        TokenKind::RBrace,
        TokenKind::LBracket,
        TokenKind::RBracket,
        TokenKind::Ampersand,
        TokenKind::Tilde,
        TokenKind::Pipe,
        TokenKind::Comma,
        TokenKind::Period,
        TokenKind::Semicolon,
        TokenKind::Colon,
        TokenKind::Ellipsis,
        TokenKind::Question,
        TokenKind::Bang,
        TokenKind::Equation,
        TokenKind::Typedef,
        TokenKind::Len,
        TokenKind::Arrow,
        TokenKind::Imply,
        TokenKind::At,
        TokenKind::Bling,
        TokenKind::Env,
        TokenKind::Cell,
        TokenKind::User,
        TokenKind::Service,
        TokenKind::Component,
        TokenKind::Job,
        TokenKind::Storage,
        TokenKind::Mutable,
        TokenKind::BoolTrue,
        TokenKind::BoolFalse,
        TokenKind::If,
        TokenKind::Else,
        TokenKind::Unless,
        TokenKind::Foreach,
        TokenKind::In,
        TokenKind::Contains,
    ];

    /// The kind with the given discriminant, if there is one.
    pub fn from_raw(raw: u8) -> Option<TokenKind> {
        TokenKind::ALL.get(raw as usize).copied()
    }

    pub const fn raw(self) -> u8 {
        self as u8
    }

    pub const fn is_literal(self) -> bool {
        is_literal_raw(self as u8)
    }

    pub const fn is_operator(self) -> bool {
        is_operator_raw(self as u8)
    }

    pub const fn is_keyword(self) -> bool {
        is_keyword_raw(self as u8)
    }

    pub const fn band(self) -> Band {
        if self.is_literal() {
            Band::Literal
        } else if self.is_operator() {
            Band::Operator
        } else if self.is_keyword() {
            Band::Keyword
        } else {
            Band::Control
        }
    }

    /// Canonical spelling, used in diagnostics and as the literal text of operators and
    /// keywords.
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::Invalid => "TOKEN_ERR",
            TokenKind::Eof => "END",
            TokenKind::Comment => "COMMENT",

            TokenKind::Ident => "ID",
            TokenKind::Integer => "INTEGER",
            TokenKind::Rational => "RATIONAL",
            TokenKind::Char => "CHAR",
            TokenKind::String => "STRING",

            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Splat => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Caret => "^",

            TokenKind::BoolAnd => "and",
            TokenKind::BoolOr => "or",
            TokenKind::BoolEq => "==",
            TokenKind::BoolNe => "!=",
            TokenKind::BoolLt => "<",
            TokenKind::BoolGt => ">",
            TokenKind::BoolLte => "<=",
            TokenKind::BoolGte => ">=",

            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",

            TokenKind::Ampersand => "&",
            TokenKind::Tilde => "~",
            TokenKind::Pipe => "|",
            TokenKind::Comma => ",",
            TokenKind::Period => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Ellipsis => "...",
            TokenKind::Question => "?",
            TokenKind::Bang => "!",

            TokenKind::Equation => "=",
            TokenKind::Typedef => "::",
            TokenKind::Len => "#",
            TokenKind::Arrow => "->",
            TokenKind::Imply => "=>",

            TokenKind::At => "@",
            TokenKind::Bling => "$",

            TokenKind::Env => "env",
            TokenKind::Cell => "cell",
            TokenKind::User => "user",
            TokenKind::Service => "service",
            TokenKind::Component => "component",
            TokenKind::Job => "job",
            TokenKind::Storage => "storage",
            TokenKind::Mutable => "mutable",

            TokenKind::BoolTrue => "true",
            TokenKind::BoolFalse => "false",

            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Unless => "unless",
            TokenKind::Foreach => "foreach",
            TokenKind::In => "in",
            TokenKind::Contains => "contains",
        }
    }

    /// The operator or keyword spelled exactly `text`.
    pub fn from_spelling(text: &str) -> Option<TokenKind> {
        TokenKind::ALL
            .iter()
            .copied()
            .filter(|kind| kind.is_operator() || kind.is_keyword())
            .find(|kind| kind.as_str() == text)
    }

    /// The literal or comment kind conventionally associated with a terminal name.
    ///
    /// Matching is case-insensitive: `ID`, `ident` and `Name` all classify as [TokenKind::Ident].
    pub fn from_terminal_name(name: &str) -> Option<TokenKind> {
        match name.to_ascii_lowercase().as_str() {
            "id" | "ident" | "identifier" | "name" => Some(TokenKind::Ident),
            "int" | "integer" | "number" => Some(TokenKind::Integer),
            "rational" | "float" | "decimal" => Some(TokenKind::Rational),
            "char" | "character" => Some(TokenKind::Char),
            "string" | "str" => Some(TokenKind::String),
            "comment" => Some(TokenKind::Comment),
            _ => None,
        }
    }
}

pub const fn is_literal_raw(raw: u8) -> bool {
    LITERAL_FIRST <= raw && raw <= LITERAL_LAST
}

pub const fn is_operator_raw(raw: u8) -> bool {
    OPERATOR_FIRST <= raw && raw <= OPERATOR_LAST
}

pub const fn is_keyword_raw(raw: u8) -> bool {
    KEYWORD_FIRST <= raw && raw <= KEYWORD_LAST
}

/// Spelling for a raw discriminant. Out-of-range values render as `<token N>`.
pub fn spell_raw(raw: u8) -> Cow<'static, str> {
    match TokenKind::from_raw(raw) {
        Some(kind) => Cow::Borrowed(kind.as_str()),
        None => Cow::Owned(format!("<token {raw}>")),
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for TokenKind {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        TokenKind::from_raw(raw).ok_or(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_is_in_discriminant_order() {
        for (index, kind) in TokenKind::ALL.iter().enumerate() {
            assert_eq!(kind.raw() as usize, index, "{kind:?} out of place");
        }
    }

    #[test]
    fn test_bands_are_contiguous() {
        let bands: Vec<Band> = TokenKind::ALL.iter().map(|k| k.band()).collect();
        let mut seen = Vec::new();
        for band in bands {
            if seen.last() != Some(&band) {
                assert!(!seen.contains(&band), "band {band:?} is split");
                seen.push(band);
            }
        }
        assert_eq!(
            seen,
            vec![Band::Control, Band::Literal, Band::Operator, Band::Keyword]
        );
    }

    #[test]
    fn test_spellings_are_unique() {
        let mut spellings = HashSet::new();
        for kind in TokenKind::ALL {
            assert!(spellings.insert(kind.as_str()), "{kind:?} spelled twice");
        }
    }

    #[test]
    fn test_out_of_range_spelling() {
        assert_eq!(spell_raw(TokenKind::Plus.raw()), "+");
        assert_eq!(spell_raw(200), "<token 200>");
        assert!(!is_literal_raw(200));
        assert!(!is_operator_raw(200));
        assert!(!is_keyword_raw(200));
        assert_eq!(TokenKind::try_from(200), Err(200));
    }

    #[test]
    fn test_from_spelling() {
        assert_eq!(TokenKind::from_spelling("->"), Some(TokenKind::Arrow));
        assert_eq!(TokenKind::from_spelling("foreach"), Some(TokenKind::Foreach));
        assert_eq!(TokenKind::from_spelling("ID"), None);
        assert_eq!(TokenKind::from_spelling("nothing"), None);
    }

    #[test]
    fn test_from_terminal_name() {
        assert_eq!(TokenKind::from_terminal_name("Name"), Some(TokenKind::Ident));
        assert_eq!(TokenKind::from_terminal_name("INTEGER"), Some(TokenKind::Integer));
        assert_eq!(TokenKind::from_terminal_name("newline"), None);
    }
}
