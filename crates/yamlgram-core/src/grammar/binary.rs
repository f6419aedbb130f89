//! Binary serialization for grammars using postcard.

use super::json::GrammarError;
use super::types::Grammar;

impl Grammar {
    /// Deserialize a grammar from binary format.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, GrammarError> {
        postcard::from_bytes(bytes).map_err(GrammarError::Binary)
    }

    /// Serialize a grammar to binary format.
    pub fn to_binary(&self) -> Result<Vec<u8>, GrammarError> {
        postcard::to_allocvec(self).map_err(GrammarError::Binary)
    }
}
