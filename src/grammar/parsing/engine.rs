//! Recursive descent over a compiled grammar
//!
//! Matching Rules
//!
//!     Every pattern is matched at a token index and either fails or succeeds with the
//!     index after the last token it consumed. A failing pattern leaves nothing recorded:
//!     sequences roll back the captures and children of the elements that did match.
//!
//!         literal "x"      a token whose text is x, whichever terminal scanned it
//!         regex `...`      a token whose whole text the regex matches
//!         terminal NAME    a token scanned by that terminal
//!         a b              each in turn
//!         a | b            the first alternative consuming a token, else the first
//!                          that succeeds consuming none
//!         x* x+            greedy, stopping at the first iteration that fails or
//!                          consumes nothing
//!         [x]              x, or nothing
//!         ~x               one token (not end of input) where x does not match
//!
//! Left Recursion
//!
//!     Re-entering a production at the position it is already being matched at returns
//!     that invocation's current seed instead of descending again. The seed starts as a
//!     failure, so the first evaluation of `r ::= r "x" | "x"` falls through to `"x"`.
//!     If the re-entry happened, the body is evaluated again with the previous result as
//!     the seed, for as long as the match keeps getting longer. Indirect recursion goes
//!     through the same check since it keys on (production, position).
//!
//! Memoization
//!
//!     A finished invocation is remembered by (production, position) and answered from
//!     the table when asked again, which keeps "long alternative, then short fallback"
//!     grammars linear. Results that read the seed of a left recursion still growing
//!     further out, or that ran into the recursion limit, depend on more than the
//!     position and are not remembered.
//!
//!     Matches are kept as shared records while parsing, so seeds and table
//!     entries are handed out without copying subtrees. The [SyntaxNode] tree is built
//!     once, from the winning match, when the parse is over.

use super::stream::TokenStream;
use super::tree::{Capture, SyntaxNode};
use crate::grammar::compiling::{CompiledGrammar, Pattern, ProductionId, Quantifier};
use crate::grammar::config::ParseConfig;
use crate::grammar::errors::ScanError;
use crate::grammar::scanning::{Matcher, Token};
use log::{trace, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;

/// Result of applying a start production to a whole input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    /// `None` when the start production does not match at all
    pub tree: Option<SyntaxNode>,
    /// The match ended right before the end-of-input token
    pub accepted: bool,
    /// Tokens consumed by the start production
    pub consumed: usize,
    /// The recursion limit cut at least one descent short, so a deeper limit may match
    /// more of the input
    pub truncated: bool,
}

/// One production match, before it becomes a [SyntaxNode]
#[derive(Debug)]
struct Matched {
    production: ProductionId,
    tokens: Range<usize>,
    /// Token indices consumed directly by the body
    captures: Vec<usize>,
    children: Vec<Rc<Matched>>,
}

/// What a production body has recorded so far
#[derive(Debug, Default)]
struct Recorded {
    captures: Vec<usize>,
    children: Vec<Rc<Matched>>,
}

impl Recorded {
    fn mark(&self) -> (usize, usize) {
        (self.captures.len(), self.children.len())
    }

    fn reset(&mut self, (captures, children): (usize, usize)) {
        self.captures.truncate(captures);
        self.children.truncate(children);
    }
}

#[derive(Debug)]
struct Head {
    seed: Option<Rc<Matched>>,
    recursed: bool,
    /// Invocation depth the head was entered at
    depth: usize,
}

type Key = (ProductionId, usize);

pub struct Engine<'g, 'src> {
    grammar: &'g CompiledGrammar,
    source: &'src str,
    stream: TokenStream<'g, 'src>,
    config: &'g ParseConfig,
    heads: HashMap<Key, Head>,
    memo: HashMap<Key, Option<Rc<Matched>>>,
    depth: usize,
    /// Shallowest head depth the running invocation has read a seed from
    dependency: usize,
    truncated: bool,
}

impl<'g, 'src> Engine<'g, 'src> {
    pub fn new(
        grammar: &'g CompiledGrammar,
        source: &'src str,
        stream: TokenStream<'g, 'src>,
        config: &'g ParseConfig,
    ) -> Self {
        Engine {
            grammar,
            source,
            stream,
            config,
            heads: HashMap::new(),
            memo: HashMap::new(),
            depth: 0,
            dependency: usize::MAX,
            truncated: false,
        }
    }

    /// Match `start` at the first token and report whether it reached end of input.
    pub fn run(mut self, start: ProductionId) -> Result<ParseOutcome, ScanError> {
        let matched = self.invoke(start, 0)?;
        let consumed = matched.as_ref().map_or(0, |m| m.tokens.end);
        let accepted = matched.is_some() && self.stream.get(consumed)?.is_eof();
        let tree = match matched {
            Some(m) => Some(self.build(&m)?),
            None => None,
        };
        Ok(ParseOutcome {
            tree,
            accepted,
            consumed,
            truncated: self.truncated,
        })
    }

    fn invoke(&mut self, id: ProductionId, pos: usize) -> Result<Option<Rc<Matched>>, ScanError> {
        if let Some(head) = self.heads.get_mut(&(id, pos)) {
            head.recursed = true;
            self.dependency = self.dependency.min(head.depth);
            return Ok(head.seed.clone());
        }
        if let Some(known) = self.memo.get(&(id, pos)) {
            return Ok(known.clone());
        }

        let depth = self.depth;
        if depth >= self.config.recursion_limit {
            let name = self.grammar.production(id).map_or("?", |def| def.name.as_str());
            warn!(
                "recursion limit {} reached entering '{name}' at token {pos}",
                self.config.recursion_limit
            );
            self.truncated = true;
            self.dependency = 0;
            return Ok(None);
        }

        let outer = std::mem::replace(&mut self.dependency, usize::MAX);
        self.depth += 1;
        self.heads.insert(
            (id, pos),
            Head {
                seed: None,
                recursed: false,
                depth,
            },
        );
        let result = self.grow(id, pos);
        self.heads.remove(&(id, pos));
        self.depth -= 1;
        let dependency = std::mem::replace(&mut self.dependency, outer);

        let result = result?;
        if dependency >= depth {
            self.memo.insert((id, pos), result.clone());
        } else {
            self.dependency = self.dependency.min(dependency);
        }
        Ok(result)
    }

    fn grow(&mut self, id: ProductionId, pos: usize) -> Result<Option<Rc<Matched>>, ScanError> {
        let mut best = self.evaluate(id, pos)?;

        loop {
            let Some(current_end) = best.as_ref().map(|m| m.tokens.end) else {
                break;
            };
            let Some(head) = self.heads.get_mut(&(id, pos)) else {
                break;
            };
            if !head.recursed {
                break;
            }
            head.seed = best.clone();
            head.recursed = false;

            match self.evaluate(id, pos)? {
                Some(next) if next.tokens.end > current_end => best = Some(next),
                _ => break,
            }
        }

        Ok(best)
    }

    fn evaluate(&mut self, id: ProductionId, pos: usize) -> Result<Option<Rc<Matched>>, ScanError> {
        let grammar = self.grammar;
        let Some(production) = grammar.production(id) else {
            return Ok(None);
        };
        trace!("enter {} at token {pos}", production.name);

        let mut recorded = Recorded::default();
        let end = self.match_pattern(&production.pattern, pos, &mut recorded)?;
        Ok(end.map(|end| {
            Rc::new(Matched {
                production: id,
                tokens: pos..end,
                captures: recorded.captures,
                children: recorded.children,
            })
        }))
    }

    fn build(&mut self, matched: &Matched) -> Result<SyntaxNode, ScanError> {
        let Range { start, end } = matched.tokens;
        let first = self.stream.get(start)?.clone();
        let span = if end > start {
            first.span.start..self.stream.get(end - 1)?.span.end
        } else {
            first.span.start..first.span.start
        };

        let mut captures = Vec::with_capacity(matched.captures.len());
        for &index in &matched.captures {
            let token = self.stream.get(index)?.clone();
            captures.push(self.capture(&token));
        }
        let mut children = Vec::with_capacity(matched.children.len());
        for child in &matched.children {
            children.push(self.build(child)?);
        }

        Ok(SyntaxNode {
            name: self
                .grammar
                .production(matched.production)
                .map_or_else(String::new, |def| def.name.clone()),
            position: first.position,
            text: self.source.get(span.clone()).unwrap_or_default().to_string(),
            span,
            tokens: start..end,
            children,
            captures,
        })
    }

    fn capture(&self, token: &Token<'src>) -> Capture {
        let terminal = token
            .terminal
            .and_then(|id| self.grammar.terminal(id))
            .map_or("", |def| def.display_name());
        Capture {
            terminal: terminal.to_string(),
            kind: token.kind,
            text: token.text.to_string(),
            span: token.span.clone(),
            position: token.position,
        }
    }

    /// Match one token against `accepts`, recording it as a capture on success.
    fn match_token(
        &mut self,
        pos: usize,
        recorded: &mut Recorded,
        accepts: impl FnOnce(&Token<'src>) -> bool,
    ) -> Result<Option<usize>, ScanError> {
        let token = self.stream.get(pos)?;
        if token.is_eof() || !accepts(token) {
            return Ok(None);
        }
        recorded.captures.push(pos);
        Ok(Some(pos + 1))
    }

    fn match_pattern(
        &mut self,
        pattern: &'g Pattern,
        pos: usize,
        recorded: &mut Recorded,
    ) -> Result<Option<usize>, ScanError> {
        match pattern {
            Pattern::Literal(text) => {
                self.match_token(pos, recorded, |token| token.text == text.as_str())
            }
            Pattern::Regex(regex) => {
                let grammar = self.grammar;
                let terminals = grammar.terminals();
                self.match_token(pos, recorded, |token| {
                    Matcher::new(terminals, token.text).matches_all(regex.body())
                })
            }
            Pattern::Terminal(id) => {
                self.match_token(pos, recorded, |token| token.terminal == Some(*id))
            }
            Pattern::Production(id) => self.match_production(*id, pos, recorded),
            // Character-level atoms only occur inside regexes and terminal bodies
            Pattern::Name(_) | Pattern::Any | Pattern::Class(_) => Ok(None),
            Pattern::Group(inner) => self.match_pattern(inner, pos, recorded),
            Pattern::Sequence(items) => self.match_sequence(items, pos, recorded),
            Pattern::Alternation(alternatives) => {
                self.match_alternation(alternatives, pos, recorded)
            }
            Pattern::Repeat(inner, quantifier) => {
                self.match_repeat(inner, *quantifier, pos, recorded)
            }
            Pattern::Optional(inner) => Ok(Some(
                self.match_pattern(inner, pos, recorded)?.unwrap_or(pos),
            )),
            Pattern::Negation(inner) => self.match_negation(inner, pos, recorded),
        }
    }

    fn match_production(
        &mut self,
        id: ProductionId,
        pos: usize,
        recorded: &mut Recorded,
    ) -> Result<Option<usize>, ScanError> {
        let Some(matched) = self.invoke(id, pos)? else {
            return Ok(None);
        };
        let end = matched.tokens.end;
        if end > pos {
            recorded.children.push(matched);
        }
        Ok(Some(end))
    }

    fn match_sequence(
        &mut self,
        items: &'g [Pattern],
        pos: usize,
        recorded: &mut Recorded,
    ) -> Result<Option<usize>, ScanError> {
        let mark = recorded.mark();
        let mut at = pos;
        for item in items {
            match self.match_pattern(item, at, recorded)? {
                Some(next) => at = next,
                None => {
                    recorded.reset(mark);
                    return Ok(None);
                }
            }
        }
        Ok(Some(at))
    }

    fn match_alternation(
        &mut self,
        alternatives: &'g [Pattern],
        pos: usize,
        recorded: &mut Recorded,
    ) -> Result<Option<usize>, ScanError> {
        let mut empty_match = None;
        for alternative in alternatives {
            let mark = recorded.mark();
            match self.match_pattern(alternative, pos, recorded)? {
                Some(end) if end > pos => return Ok(Some(end)),
                Some(_) => {
                    recorded.reset(mark);
                    empty_match = empty_match.or(Some(pos));
                }
                None => {}
            }
        }
        Ok(empty_match)
    }

    fn match_repeat(
        &mut self,
        inner: &'g Pattern,
        quantifier: Quantifier,
        pos: usize,
        recorded: &mut Recorded,
    ) -> Result<Option<usize>, ScanError> {
        let mut at = pos;
        let mut matched = false;
        while let Some(next) = self.match_pattern(inner, at, recorded)? {
            matched = true;
            if next == at {
                break;
            }
            at = next;
        }
        if quantifier == Quantifier::OneOrMore && !matched {
            return Ok(None);
        }
        Ok(Some(at))
    }

    fn match_negation(
        &mut self,
        inner: &'g Pattern,
        pos: usize,
        recorded: &mut Recorded,
    ) -> Result<Option<usize>, ScanError> {
        let mut scratch = Recorded::default();
        if self.match_pattern(inner, pos, &mut scratch)?.is_some() {
            return Ok(None);
        }
        self.match_token(pos, recorded, |_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::compiling::compile;
    use crate::grammar::scanning::Scanner;

    fn run(grammar: &str, start: &str, input: &str) -> ParseOutcome {
        let grammar = compile(grammar).unwrap();
        let config = ParseConfig::default();
        let start = grammar.production_id(start).unwrap();
        let stream = TokenStream::new(Scanner::new(&grammar, input));
        Engine::new(&grammar, input, stream, &config).run(start).unwrap()
    }

    #[test]
    fn test_failed_sequence_records_nothing() {
        let outcome = run("skip ` `\np ::= (\"a\" \"b\" | \"a\") \"c\"", "p", "a c");
        assert!(outcome.accepted);
        let tree = outcome.tree.unwrap();
        let texts: Vec<_> = tree.captures().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }

    #[test]
    fn test_zero_width_children_are_dropped() {
        let outcome = run("p ::= q \"x\" q\nq ::= \"y\"*", "p", "xy");
        let tree = outcome.tree.unwrap();
        assert_eq!(tree.children().len(), 1);
        assert_eq!(tree.children()[0].text(), "y");
        assert_eq!(tree.children()[0].token_range(), 1..2);
    }

    #[test]
    fn test_negation_captures_one_token() {
        let outcome = run(
            "skip ` `\ntoken W `{a-z}+`\np ::= \"(\" (~\")\")* \")\"",
            "p",
            "( a b )",
        );
        assert!(outcome.accepted);
        assert_eq!(outcome.tree.unwrap().captures().len(), 4);
    }

    #[test]
    fn test_negation_does_not_consume_eof() {
        let outcome = run("p ::= \"a\" ~\"b\"", "p", "a");
        assert!(outcome.tree.is_none());
    }

    #[test]
    fn test_indirect_left_recursion() {
        let outcome = run(
            "skip ` `\ntoken NUM `{0-9}+`\nsum ::= term | NUM\nterm ::= sum \"+\" NUM",
            "sum",
            "1 + 2 + 3",
        );
        assert!(outcome.accepted);
        assert_eq!(outcome.consumed, 5);
    }

    #[test]
    fn test_recursion_limit_fails_the_match() {
        let grammar = compile("p ::= \"(\" p \")\" | \"x\"").unwrap();
        let input = "((((x))))";
        let start = grammar.production_id("p").unwrap();

        let shallow = ParseConfig::default().with_recursion_limit(3);
        let stream = TokenStream::new(Scanner::new(&grammar, input));
        let outcome = Engine::new(&grammar, input, stream, &shallow).run(start).unwrap();
        assert!(outcome.tree.is_none());

        let deep = ParseConfig::default();
        let stream = TokenStream::new(Scanner::new(&grammar, input));
        let outcome = Engine::new(&grammar, input, stream, &deep).run(start).unwrap();
        assert!(outcome.accepted);
    }

    #[test]
    fn test_regex_atom_matches_whole_token() {
        let outcome = run(
            "skip ` `\ntoken WORD `{a-z}+`\np ::= `a{a-z}*` WORD",
            "p",
            "abc abc",
        );
        assert!(outcome.accepted);
        let outcome = run(
            "skip ` `\ntoken WORD `{a-z}+`\np ::= `a{a-z}*` WORD",
            "p",
            "bc abc",
        );
        assert!(outcome.tree.is_none());
    }

    #[test]
    fn test_truncation_at_the_limit() {
        let grammar = compile("p ::= \"(\" p \")\" | \"x\"").unwrap();
        let start = grammar.production_id("p").unwrap();
        let config = ParseConfig::default().with_recursion_limit(4);

        let fits = "(((x)))";
        let stream = TokenStream::new(Scanner::new(&grammar, fits));
        let outcome = Engine::new(&grammar, fits, stream, &config).run(start).unwrap();
        assert!(outcome.accepted);
        assert!(!outcome.truncated);

        let too_deep = "((((x))))";
        let stream = TokenStream::new(Scanner::new(&grammar, too_deep));
        let outcome = Engine::new(&grammar, too_deep, stream, &config).run(start).unwrap();
        assert!(outcome.tree.is_none());
        assert!(outcome.truncated);
    }

    #[test]
    fn test_remembered_match_is_reused_as_child() {
        let outcome = run(
            "skip ` `\nexpr ::= term \"+\" expr | term\nterm ::= \"(\" expr \")\" | \"x\"",
            "expr",
            "((x)) + x",
        );
        assert!(outcome.accepted);
        let tree = outcome.tree.unwrap();
        assert_eq!(tree.child(0).map(SyntaxNode::text), Some("((x))"));
        assert_eq!(tree.child(1).map(SyntaxNode::text), Some("x"));
        assert_eq!(tree.find("term").and_then(|term| term.capture(1)), Some("("));
    }
}
