use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::base::HashAlgorithm;

/// Configuration for building a tree from a leaf file.
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    /// Hash function used for leaf and internal node hashing.
    pub hash: HashAlgorithm,
    /// How each line of a leaf file maps to payload bytes.
    pub leaf_encoding: LeafEncoding,
    /// Hash each tree level in parallel.
    pub parallel: bool,
}

/// Leaf payload encoding in leaf files.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeafEncoding {
    /// The raw bytes of each line.
    #[default]
    Utf8,
    /// Each line is hex-decoded.
    Hex,
}

impl TreeConfig {
    /// Create a new tree configuration.
    #[must_use]
    pub const fn new(hash: HashAlgorithm, leaf_encoding: LeafEncoding, parallel: bool) -> Self {
        Self {
            hash,
            leaf_encoding,
            parallel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config: TreeConfig = serde_json::from_str("{}").expect("empty config should parse");
        assert_eq!(config, TreeConfig::default());
        assert_eq!(config.hash, HashAlgorithm::Sm3);
        assert_eq!(config.leaf_encoding, LeafEncoding::Utf8);
        assert!(!config.parallel);
    }

    #[test]
    fn lowercase_names_parse() {
        let config: TreeConfig =
            serde_json::from_str(r#"{"hash":"sha256","leaf_encoding":"hex","parallel":true}"#)
                .expect("config should parse");
        assert_eq!(
            config,
            TreeConfig::new(HashAlgorithm::Sha256, LeafEncoding::Hex, true)
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<TreeConfig>(r#"{"hsah":"sm3"}"#);
        assert!(result.is_err());
    }
}
