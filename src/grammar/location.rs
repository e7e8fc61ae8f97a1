//! Positions in grammar descriptions and scanned input
//!
//! Tokens carry byte ranges into their source. Diagnostics and syntax tree nodes also need
//! line and column numbers, which [SourceLocation] computes from a table of line start
//! offsets built once per source:
//!
//! ```text
//! Source: "ab\ncd"
//!   line_starts = [0, 3]
//!
//! byte_to_position(4):
//!   - binary_search(&4) -> Err(2), so line 1
//!   - column: 4 - 3 = 1
//!   - Position { line: 1, column: 1 }
//! ```
//!
//! Lines and columns are zero-based and columns count bytes.

use serde::Serialize;
use std::fmt;

/// A position in source text (line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Fast conversion from byte offsets to line/column positions
#[derive(Debug, Clone)]
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self { line_starts }
    }

    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let column = byte_offset - self.line_starts[line];

        Position::new(line, column)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
