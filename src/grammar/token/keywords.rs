//! Reserved word lookup.
//!
//! The table is built from the keyword band of [TokenKind] when a grammar is compiled and
//! is read-only afterwards. It is passed explicitly to the scanner through the compiled
//! grammar rather than living in a global.

use super::kind::TokenKind;
use std::collections::HashMap;

/// Maps reserved spellings to their keyword kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    words: HashMap<&'static str, TokenKind>,
}

impl KeywordTable {
    pub fn new() -> Self {
        let words = TokenKind::ALL
            .iter()
            .copied()
            .filter(|kind| kind.is_keyword())
            .map(|kind| (kind.as_str(), kind))
            .collect();
        KeywordTable { words }
    }

    /// The keyword spelled `word`, if it is reserved.
    pub fn lookup(&self, word: &str) -> Option<TokenKind> {
        self.words.get(word).copied()
    }

    /// The keyword kind for a reserved `word`, [TokenKind::Ident] otherwise.
    pub fn classify(&self, word: &str) -> TokenKind {
        self.lookup(word).unwrap_or(TokenKind::Ident)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Reserved spellings, sorted.
    pub fn words(&self) -> Vec<&'static str> {
        let mut words: Vec<_> = self.words.keys().copied().collect();
        words.sort_unstable();
        words
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_keyword_band() {
        let table = KeywordTable::new();
        let keywords = TokenKind::ALL.iter().filter(|k| k.is_keyword()).count();
        assert_eq!(table.len(), keywords);
        for kind in TokenKind::ALL.iter().filter(|k| k.is_keyword()) {
            assert_eq!(table.lookup(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn test_classify() {
        let table = KeywordTable::new();
        assert_eq!(table.classify("foreach"), TokenKind::Foreach);
        assert_eq!(table.classify("true"), TokenKind::BoolTrue);
        assert_eq!(table.classify("forever"), TokenKind::Ident);
        // Operators spelled with letters are not keywords.
        assert_eq!(table.classify("and"), TokenKind::Ident);
    }
}
