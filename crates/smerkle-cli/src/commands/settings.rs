//! Configuration layering: defaults, then the JSON file, then flags and environment.

use std::path::PathBuf;

use eyre::Context as _;
use smerkle_core::base::HashAlgorithm;
use smerkle_core::schema::config::{LeafEncoding, TreeConfig};
use tracing::debug;

/// Settings given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Optional JSON configuration file.
    pub config_file: Option<PathBuf>,
    /// Hash function override.
    pub hash: Option<HashAlgorithm>,
    /// Leaf encoding override.
    pub leaf_encoding: Option<LeafEncoding>,
    /// Parallel hashing; enables it when set, never disables a config file's choice.
    pub parallel: bool,
}

impl ConfigOverrides {
    /// Apply the overrides on top of `base`.
    #[must_use]
    pub fn apply(&self, base: TreeConfig) -> TreeConfig {
        TreeConfig::new(
            self.hash.unwrap_or(base.hash),
            self.leaf_encoding.unwrap_or(base.leaf_encoding),
            self.parallel || base.parallel,
        )
    }

    /// Load the configuration file, if any, and apply the overrides.
    ///
    /// # Errors
    /// Returns an error if the configuration file cannot be read or parsed.
    pub async fn resolve(&self) -> eyre::Result<TreeConfig> {
        let base = match &self.config_file {
            Some(path) => {
                let contents = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            None => TreeConfig::default(),
        };
        let config = self.apply(base);
        debug!(
            hash = %config.hash,
            leaf_encoding = ?config.leaf_encoding,
            parallel = config.parallel,
            "Resolved tree configuration"
        );
        Ok(config)
    }
}
