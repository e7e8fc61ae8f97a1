//! Character-level matching of terminal and regex patterns
//!
//!     Patterns are anchored at a byte offset and evaluated to the set of every offset a
//!     match can end at, so alternation and repetition never commit early: `a|ab` on
//!     "ab" reaches both 1 and 2. The scanner keeps the largest end; the engine asks
//!     whether a regex can end exactly at the end of a token's text.
//!
//!     Terminal references are inlined. Compilation guarantees they are acyclic.

use crate::grammar::compiling::{Pattern, Quantifier, TerminalDef};
use std::collections::BTreeSet;

pub(crate) struct Matcher<'g, 'src> {
    terminals: &'g [TerminalDef],
    input: &'src str,
}

impl<'g, 'src> Matcher<'g, 'src> {
    pub fn new(terminals: &'g [TerminalDef], input: &'src str) -> Self {
        Matcher { terminals, input }
    }

    /// Longest non-empty match length of `pattern` at `start`.
    pub fn longest(&self, pattern: &Pattern, start: usize) -> Option<usize> {
        self.ends(pattern, start)
            .into_iter()
            .next_back()
            .filter(|&end| end > start)
            .map(|end| end - start)
    }

    /// Whether `pattern` matches the whole input.
    pub fn matches_all(&self, pattern: &Pattern) -> bool {
        self.ends(pattern, 0).contains(&self.input.len())
    }

    fn next_char(&self, at: usize) -> Option<char> {
        self.input.get(at..).and_then(|rest| rest.chars().next())
    }

    fn ends(&self, pattern: &Pattern, start: usize) -> BTreeSet<usize> {
        let mut ends = BTreeSet::new();
        match pattern {
            Pattern::Literal(text) => {
                let rest = self.input.get(start..).unwrap_or_default();
                if rest.starts_with(text.as_str()) {
                    ends.insert(start + text.len());
                }
            }
            Pattern::Any => {
                if let Some(c) = self.next_char(start) {
                    ends.insert(start + c.len_utf8());
                }
            }
            Pattern::Class(class) => {
                if let Some(c) = self.next_char(start).filter(|&c| class.contains(c)) {
                    ends.insert(start + c.len_utf8());
                }
            }
            Pattern::Regex(regex) => return self.ends(regex.body(), start),
            Pattern::Terminal(id) => {
                if let Some(def) = self.terminals.get(id.0) {
                    return self.ends(&def.pattern, start);
                }
            }
            // Never produced inside terminal bodies after compilation
            Pattern::Name(_) | Pattern::Production(_) => {}
            Pattern::Group(inner) => return self.ends(inner, start),
            Pattern::Sequence(items) => {
                let mut frontier = BTreeSet::from([start]);
                for item in items {
                    let mut next = BTreeSet::new();
                    for &at in &frontier {
                        next.extend(self.ends(item, at));
                    }
                    if next.is_empty() {
                        return next;
                    }
                    frontier = next;
                }
                return frontier;
            }
            Pattern::Alternation(alternatives) => {
                for alternative in alternatives {
                    ends.extend(self.ends(alternative, start));
                }
            }
            Pattern::Optional(inner) => {
                ends.insert(start);
                ends.extend(self.ends(inner, start));
            }
            Pattern::Repeat(inner, quantifier) => {
                let mut pending: Vec<usize> = self.ends(inner, start).into_iter().collect();
                ends.extend(pending.iter().copied());
                while let Some(at) = pending.pop() {
                    for end in self.ends(inner, at) {
                        if ends.insert(end) {
                            pending.push(end);
                        }
                    }
                }
                if *quantifier == Quantifier::ZeroOrMore {
                    ends.insert(start);
                }
            }
            Pattern::Negation(inner) => {
                if let Some(c) = self.next_char(start) {
                    if self.ends(inner, start).is_empty() {
                        ends.insert(start + c.len_utf8());
                    }
                }
            }
        }
        ends
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::compiling::regex;

    fn longest(source: &str, input: &str) -> Option<usize> {
        let regex = regex::compile(source).unwrap();
        Matcher::new(&[], input).longest(regex.body(), 0)
    }

    #[test]
    fn test_alternation_prefers_longest() {
        assert_eq!(longest("a|ab", "abc"), Some(2));
    }

    #[test]
    fn test_repetition_backs_off() {
        // `.*` must give back the final quote
        assert_eq!(longest("\".*\"", "\"a\" \"b\" c"), Some(7));
        assert_eq!(longest("\"(~\")*\"", "\"a\" \"b\" c"), Some(3));
    }

    #[test]
    fn test_zero_length_is_no_match() {
        assert_eq!(longest("a*", "bbb"), None);
        assert_eq!(longest("[x]", "y"), None);
    }

    #[test]
    fn test_negation_consumes_one_char() {
        assert_eq!(longest("~\\n", "é\n"), Some(2));
        assert_eq!(longest("~\\n", "\n"), None);
        assert_eq!(longest("~{a-z}+", "42abc"), Some(2));
    }

    #[test]
    fn test_matches_all() {
        let regex = regex::compile("{a-z}+").unwrap();
        assert!(Matcher::new(&[], "abc").matches_all(regex.body()));
        assert!(!Matcher::new(&[], "abc1").matches_all(regex.body()));
    }
}
