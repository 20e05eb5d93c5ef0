//! Command-line interface for the `smerkle` CLI application.

pub mod constants;
mod proof;
mod tree;

use std::path::PathBuf;

use clap::Parser;
use eyre::{Result, eyre};
use smerkle_core::base::HashAlgorithm;
use smerkle_core::schema::config::LeafEncoding;

use self::constants::{
    DEFAULT_LEAVES_FILE, SMERKLE_CONFIG_FILE, SMERKLE_HASH, SMERKLE_LEAF_ENCODING,
    SMERKLE_LEAVES_FILE, SMERKLE_PARALLEL,
};
pub use self::proof::ProofCommands;
pub use self::tree::TreeCommands;
use crate::commands::ConfigOverrides;

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(name = "smerkle")]
#[command(about = "Merkle tree inclusion and absence proofs")]
pub struct Cli {
    /// CLI top-level command group.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level command groups.
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Build a tree and inspect it.
    Tree {
        /// Tree subcommands.
        #[command(subcommand)]
        command: TreeCommands,
    },
    /// Generate and verify proofs.
    Proof {
        /// Proof subcommands.
        #[command(subcommand)]
        command: ProofCommands,
    },
    /// Prints the schema of the configuration JSON file.
    ConfigSchema,
}

/// Arguments shared by every command that builds a tree.
#[derive(Debug, clap::Args)]
pub struct TreeArgs {
    /// Leaf file, one payload per line.
    #[arg(long, env = SMERKLE_LEAVES_FILE, default_value = DEFAULT_LEAVES_FILE)]
    pub leaves: PathBuf,
    /// Optional JSON configuration file. Flags and environment variables override it.
    #[arg(long, env = SMERKLE_CONFIG_FILE)]
    pub config: Option<PathBuf>,
    /// Hash function (`sm3` or `sha256`).
    #[arg(long, env = SMERKLE_HASH, value_parser = parse_hash_algorithm)]
    pub hash: Option<HashAlgorithm>,
    /// Leaf line encoding (`utf8` or `hex`).
    #[arg(long, env = SMERKLE_LEAF_ENCODING, value_parser = parse_leaf_encoding)]
    pub leaf_encoding: Option<LeafEncoding>,
    /// Hash each tree level in parallel.
    #[arg(long, env = SMERKLE_PARALLEL, default_value_t = false)]
    pub parallel: bool,
}

impl TreeArgs {
    /// Split into the leaf file path and the configuration overrides.
    #[must_use]
    pub fn into_parts(self) -> (PathBuf, ConfigOverrides) {
        (
            self.leaves,
            ConfigOverrides {
                config_file: self.config,
                hash: self.hash,
                leaf_encoding: self.leaf_encoding,
                parallel: self.parallel,
            },
        )
    }
}

/// Parse a `--hash` value.
///
/// # Errors
/// Returns an error for an unknown algorithm name.
pub fn parse_hash_algorithm(s: &str) -> Result<HashAlgorithm> {
    match s {
        "sm3" => Ok(HashAlgorithm::Sm3),
        "sha256" => Ok(HashAlgorithm::Sha256),
        other => Err(eyre!(
            "Invalid hash algorithm: {other}. Expected 'sm3' or 'sha256'."
        )),
    }
}

/// Parse a `--leaf-encoding` value.
///
/// # Errors
/// Returns an error for an unknown encoding name.
pub fn parse_leaf_encoding(s: &str) -> Result<LeafEncoding> {
    match s {
        "utf8" => Ok(LeafEncoding::Utf8),
        "hex" => Ok(LeafEncoding::Hex),
        other => Err(eyre!(
            "Invalid leaf encoding: {other}. Expected 'utf8' or 'hex'."
        )),
    }
}
