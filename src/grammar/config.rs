//! Parse configuration
//!
//! Knobs for a single parse invocation. Every field has a default, so a JSON document
//! only needs to name what it changes:
//!
//! ```text
//! { "recursion_limit": 32 }
//! ```

use serde::{Deserialize, Serialize};

/// Settings threaded through the scanner and the engine for one parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Maximum depth of nested production invocations. A descent that would go deeper
    /// fails to match instead of exhausting the stack, and the outcome is marked
    /// truncated.
    ///
    /// Every nested invocation takes a few frames of native stack per level of pattern
    /// nesting in its production. The default fits a 2 MiB thread stack in unoptimized
    /// builds; raise it together with the stack of the thread that parses.
    pub recursion_limit: usize,
    /// Reclassify identifier tokens that spell a reserved word.
    pub classify_keywords: bool,
}

impl ParseConfig {
    pub const DEFAULT_RECURSION_LIMIT: usize = 64;

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn with_keyword_classification(mut self, enabled: bool) -> Self {
        self.classify_keywords = enabled;
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            recursion_limit: Self::DEFAULT_RECURSION_LIMIT,
            classify_keywords: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParseConfig::default();
        assert_eq!(config.recursion_limit, 64);
        assert!(config.classify_keywords);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ParseConfig::from_json(r#"{ "recursion_limit": 32 }"#).unwrap();
        assert_eq!(config, ParseConfig::default().with_recursion_limit(32));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(ParseConfig::from_json(r#"{ "classify_keywords": "yes" }"#).is_err());
    }
}
