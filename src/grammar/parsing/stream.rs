//! Backtracking token buffer over a lazy scanner
//!
//! The engine addresses tokens by index and backtracks freely. Tokens are pulled from
//! the [Scanner] only when an index past the buffered ones is requested, so a parse
//! that stops early never scans the rest of the input. Indices past the end of input
//! all read as the end-of-input token.

use crate::grammar::errors::ScanError;
use crate::grammar::scanning::{Scanner, Token};

pub struct TokenStream<'g, 'src> {
    scanner: Scanner<'g, 'src>,
    buffer: Vec<Token<'src>>,
    eof: Token<'src>,
    error: Option<ScanError>,
    exhausted: bool,
}

impl<'g, 'src> TokenStream<'g, 'src> {
    pub fn new(scanner: Scanner<'g, 'src>) -> Self {
        let eof = scanner.end_of_input();
        TokenStream {
            scanner,
            buffer: Vec::new(),
            eof,
            error: None,
            exhausted: false,
        }
    }

    /// The token at `index`, scanning forward as needed. A scan error is sticky: every
    /// later request for an index at or past it fails the same way.
    pub fn get(&mut self, index: usize) -> Result<&Token<'src>, ScanError> {
        while self.buffer.len() <= index && !self.exhausted {
            if let Some(err) = &self.error {
                return Err(err.clone());
            }
            match self.scanner.next() {
                Some(Ok(token)) if token.is_eof() => self.exhausted = true,
                Some(Ok(token)) => self.buffer.push(token),
                Some(Err(err)) => {
                    self.error = Some(err.clone());
                    return Err(err);
                }
                None => self.exhausted = true,
            }
        }
        Ok(self.buffer.get(index).unwrap_or(&self.eof))
    }

    /// Tokens scanned so far, end of input excluded.
    pub fn scanned(&self) -> &[Token<'src>] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::compiling::compile;

    #[test]
    fn test_scans_lazily() {
        let grammar = compile("token A \"a\"").unwrap();
        let mut stream = TokenStream::new(Scanner::new(&grammar, "aaa$"));
        assert_eq!(stream.get(1).unwrap().text, "a");
        assert_eq!(stream.scanned().len(), 2);
        assert!(stream.get(3).is_err());
        assert!(stream.get(5).is_err());
        assert_eq!(stream.get(0).unwrap().text, "a");
    }

    #[test]
    fn test_past_the_end_is_eof() {
        let grammar = compile("token A \"a\"").unwrap();
        let mut stream = TokenStream::new(Scanner::new(&grammar, "a"));
        assert!(stream.get(1).unwrap().is_eof());
        assert!(stream.get(9).unwrap().is_eof());
    }
}
