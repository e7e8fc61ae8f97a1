//! Properties of the token model: band partition, precedence order and keyword lookup

use metagram::grammar::token::kind::{is_keyword_raw, is_literal_raw, is_operator_raw, spell_raw};
use metagram::{compile, tokenize, KeywordTable, Precedence, TokenKind};
use proptest::prelude::*;
use rstest::rstest;

#[test]
fn test_every_kind_is_in_at_most_one_band() {
    for kind in TokenKind::ALL {
        let memberships = [kind.is_literal(), kind.is_operator(), kind.is_keyword()]
            .into_iter()
            .filter(|&member| member)
            .count();
        let control = matches!(kind, TokenKind::Invalid | TokenKind::Eof | TokenKind::Comment);
        assert_eq!(memberships, if control { 0 } else { 1 }, "{kind:?}");
    }
}

#[rstest]
#[case(TokenKind::BoolOr, Precedence::Disjunction)]
#[case(TokenKind::BoolAnd, Precedence::Conjunction)]
#[case(TokenKind::BoolEq, Precedence::Equality)]
#[case(TokenKind::BoolNe, Precedence::Equality)]
#[case(TokenKind::BoolLt, Precedence::Relation)]
#[case(TokenKind::BoolLte, Precedence::Relation)]
#[case(TokenKind::BoolGte, Precedence::Relation)]
#[case(TokenKind::BoolGt, Precedence::Relation)]
#[case(TokenKind::Ampersand, Precedence::Record)]
#[case(TokenKind::Tilde, Precedence::Record)]
#[case(TokenKind::Pipe, Precedence::Record)]
#[case(TokenKind::Plus, Precedence::Additive)]
#[case(TokenKind::Minus, Precedence::Additive)]
#[case(TokenKind::Splat, Precedence::Multiplicative)]
#[case(TokenKind::Slash, Precedence::Multiplicative)]
#[case(TokenKind::Percent, Precedence::Multiplicative)]
#[case(TokenKind::Caret, Precedence::Exponential)]
fn test_binary_operator_precedence(#[case] kind: TokenKind, #[case] expected: Precedence) {
    assert_eq!(kind.precedence(), expected);
    assert!(kind.is_binary_operator());
}

#[test]
fn test_precedence_levels_strictly_increase() {
    let order = [
        Precedence::Lowest,
        Precedence::Disjunction,
        Precedence::Conjunction,
        Precedence::Equality,
        Precedence::Relation,
        Precedence::Record,
        Precedence::Additive,
        Precedence::Multiplicative,
        Precedence::Exponential,
        Precedence::Unary,
        Precedence::Call,
    ];
    for pair in order.windows(2) {
        assert!(pair[0].level() < pair[1].level(), "{:?} < {:?}", pair[0], pair[1]);
    }
}

#[test]
fn test_non_operators_have_lowest_precedence() {
    let membership = [TokenKind::In, TokenKind::Contains];
    for kind in TokenKind::ALL
        .into_iter()
        .filter(|kind| !kind.is_operator() && !membership.contains(kind))
    {
        assert_eq!(kind.precedence(), Precedence::Lowest, "{kind:?}");
    }
}

#[rstest]
#[case(TokenKind::In)]
#[case(TokenKind::Contains)]
fn test_membership_keywords_bind_like_relations(#[case] kind: TokenKind) {
    assert!(kind.is_keyword());
    assert_eq!(kind.precedence(), Precedence::Relation);
    assert!(kind.is_binary_operator());
}

#[rstest]
#[case(TokenKind::Percent, "%")]
#[case(TokenKind::BoolNe, "!=")]
#[case(TokenKind::Ident, "ID")]
#[case(TokenKind::Eof, "END")]
#[case(TokenKind::Invalid, "TOKEN_ERR")]
#[case(TokenKind::Foreach, "foreach")]
fn test_spellings(#[case] kind: TokenKind, #[case] spelling: &str) {
    assert_eq!(kind.to_string(), spelling);
}

#[test]
fn test_every_keyword_spelling_scans_as_its_keyword() {
    let grammar = compile("skip ` `\ntoken ident `{a-z}+`").unwrap();
    let table = KeywordTable::new();
    for word in table.words() {
        let tokens = tokenize(&grammar, word).unwrap();
        assert_eq!(tokens[0].kind, table.lookup(word), "{word}");
        assert!(tokens[0].kind.is_some_and(TokenKind::is_keyword), "{word}");
    }
}

proptest! {
    #[test]
    fn test_raw_band_tests_are_total(raw in any::<u8>()) {
        let memberships = [is_literal_raw(raw), is_operator_raw(raw), is_keyword_raw(raw)]
            .into_iter()
            .filter(|&member| member)
            .count();
        prop_assert!(memberships <= 1);
        match TokenKind::from_raw(raw) {
            Some(kind) => {
                prop_assert_eq!(kind.is_literal(), is_literal_raw(raw));
                prop_assert_eq!(spell_raw(raw), kind.as_str());
            }
            None => {
                prop_assert_eq!(memberships, 0);
                prop_assert_eq!(spell_raw(raw).into_owned(), format!("<token {raw}>"));
            }
        }
    }

    #[test]
    fn test_words_classify_as_keyword_or_identifier(word in "[a-z]{1,10}") {
        let grammar = compile("token ident `{a-z}+`").unwrap();
        let tokens = tokenize(&grammar, &word).unwrap();
        let expected = KeywordTable::new().lookup(&word).unwrap_or(TokenKind::Ident);
        prop_assert_eq!(tokens[0].kind, Some(expected));
    }
}
