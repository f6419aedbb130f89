//! JSON serialization for grammars.

use super::types::Grammar;

/// Error while decoding a serialized grammar.
#[derive(Debug)]
pub enum GrammarError {
    Json(serde_json::Error),
    Binary(postcard::Error),
}

impl std::fmt::Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON grammar error: {e}"),
            Self::Binary(e) => write!(f, "binary grammar error: {e}"),
        }
    }
}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Binary(e) => Some(e),
        }
    }
}

impl Grammar {
    /// Parse a grammar from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        serde_json::from_str(json).map_err(GrammarError::Json)
    }

    /// Pretty-printed JSON, one production per top-level key.
    pub fn to_json(&self) -> Result<String, GrammarError> {
        serde_json::to_string_pretty(self).map_err(GrammarError::Json)
    }
}
