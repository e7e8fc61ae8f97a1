//! Parsing token streams with compiled productions
//!
//! The [engine](engine) applies a start production to the tokens of an input, pulling
//! them lazily through a [TokenStream](stream::TokenStream), and builds [SyntaxNode]s for
//! the productions that matched. Each parse owns its stream and tree; the grammar is only
//! borrowed.

pub mod engine;
pub mod stream;
pub mod tree;

pub use engine::{Engine, ParseOutcome};
pub use stream::TokenStream;
pub use tree::{Capture, SyntaxNode};
