//! Token model shared by the scanner, the keyword table and expression-grammar consumers.
//!
//!     Token kinds form a closed, ordered set split into four contiguous bands:
//!
//!     Control Kinds:
//!         Invalid, Eof and Comment. They belong to no band and answer false to every band
//!         test.
//!
//!     Literal Kinds:
//!         Identifiers, integers, rationals, characters and strings.
//!
//!     Operator Kinds:
//!         Arithmetic, boolean, grouping and punctuation symbols, the assignment and type
//!         operators, and two symbols reserved for future use (`@`, `$`).
//!
//!     Keyword Kinds:
//!         Domain reserved words, the boolean literals and control-flow words. Their spelling
//!         is what the [KeywordTable] maps back to a kind.
//!
//!     Band membership is a range test over the enum discriminants, so reordering the
//!     enumeration must keep each band contiguous. The tests in [kind] pin the layout.

pub mod keywords;
pub mod kind;
pub mod precedence;

pub use keywords::KeywordTable;
pub use kind::{Band, TokenKind};
pub use precedence::Precedence;
