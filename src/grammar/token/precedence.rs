//! Binary operator precedence.
//!
//! Non-operators get the lowest precedence, unary operators bind tighter than every binary
//! operator, and calls, indexing and dereferencing sit above everything else.

use super::kind::TokenKind;
use serde::Serialize;

/// Precedence levels, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Precedence {
    /// Everything that is not a binary operator.
    Lowest,
    /// `or`
    Disjunction,
    /// `and`
    Conjunction,
    /// `==`, `!=`
    Equality,
    /// `<`, `<=`, `>=`, `>`, `in`, `contains`
    Relation,
    /// `&`, `~`, `|`
    Record,
    /// `+`, `-`
    Additive,
    /// `*`, `/`, `%`
    Multiplicative,
    /// `^`
    Exponential,
    Unary,
    Call,
}

impl Precedence {
    pub const fn level(self) -> u8 {
        self as u8
    }
}

impl TokenKind {
    /// Precedence of this kind used as a binary operator.
    ///
    /// The match lists every kind without a wildcard arm, so adding a kind fails to
    /// compile until it is classified here.
    pub const fn precedence(self) -> Precedence {
        match self {
            TokenKind::BoolOr => Precedence::Disjunction,
            TokenKind::BoolAnd => Precedence::Conjunction,
            TokenKind::BoolEq | TokenKind::BoolNe => Precedence::Equality,
            TokenKind::BoolLt
            | TokenKind::BoolLte
            | TokenKind::BoolGte
            | TokenKind::BoolGt
            | TokenKind::In
            | TokenKind::Contains => Precedence::Relation,
            TokenKind::Ampersand | TokenKind::Tilde | TokenKind::Pipe => Precedence::Record,
            TokenKind::Plus | TokenKind::Minus => Precedence::Additive,
            TokenKind::Splat | TokenKind::Slash | TokenKind::Percent => {
                Precedence::Multiplicative
            }
            TokenKind::Caret => Precedence::Exponential,

            // Operators that never appear between two operands.
            TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::Comma
            | TokenKind::Period
            | TokenKind::Semicolon
            | TokenKind::Colon
            | TokenKind::Ellipsis
            | TokenKind::Question
            | TokenKind::Bang
            | TokenKind::Equation
            | TokenKind::Typedef
            | TokenKind::Len
            | TokenKind::Arrow
            | TokenKind::Imply
            | TokenKind::At
            | TokenKind::Bling => Precedence::Lowest,

            TokenKind::Invalid
            | TokenKind::Eof
            | TokenKind::Comment
            | TokenKind::Ident
            | TokenKind::Integer
            | TokenKind::Rational
            | TokenKind::Char
            | TokenKind::String => Precedence::Lowest,

            TokenKind::Env
            | TokenKind::Cell
            | TokenKind::User
            | TokenKind::Service
            | TokenKind::Component
            | TokenKind::Job
            | TokenKind::Storage
            | TokenKind::Mutable
            | TokenKind::BoolTrue
            | TokenKind::BoolFalse
            | TokenKind::If
            | TokenKind::Else
            | TokenKind::Unless
            | TokenKind::Foreach => Precedence::Lowest,
        }
    }

    /// True when this kind is a binary operator, i.e. has more than the lowest precedence.
    pub const fn is_binary_operator(self) -> bool {
        !matches!(self.precedence(), Precedence::Lowest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_order_is_strictly_increasing() {
        let ordered = [
            TokenKind::BoolOr,
            TokenKind::BoolAnd,
            TokenKind::BoolEq,
            TokenKind::BoolLt,
            TokenKind::Pipe,
            TokenKind::Plus,
            TokenKind::Splat,
            TokenKind::Caret,
        ];
        for pair in ordered.windows(2) {
            assert!(
                pair[0].precedence() < pair[1].precedence(),
                "{:?} should bind weaker than {:?}",
                pair[0],
                pair[1]
            );
        }
        assert!(Precedence::Exponential < Precedence::Unary);
        assert!(Precedence::Unary < Precedence::Call);
    }

    #[test]
    fn test_binary_operators_are_operators_or_membership_words() {
        for kind in TokenKind::ALL {
            if kind.is_binary_operator() && !matches!(kind, TokenKind::In | TokenKind::Contains) {
                assert!(kind.is_operator(), "{kind:?} has precedence outside the operator band");
            }
        }
    }

    #[test]
    fn test_membership_words_are_relations() {
        assert!(TokenKind::In.is_keyword());
        assert_eq!(TokenKind::In.precedence(), Precedence::Relation);
        assert_eq!(TokenKind::Contains.precedence(), TokenKind::BoolLt.precedence());
    }

    #[test]
    fn test_unary_only_and_keywords_are_lowest() {
        assert_eq!(TokenKind::Bang.precedence(), Precedence::Lowest);
        assert_eq!(TokenKind::If.precedence(), Precedence::Lowest);
        assert_eq!(TokenKind::Ident.precedence(), Precedence::Lowest);
        assert_eq!(TokenKind::Eof.precedence(), Precedence::Lowest);
    }
}
