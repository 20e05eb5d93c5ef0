//! `tree` subcommands: build a tree and print its shape.

use std::path::PathBuf;
use std::sync::Arc;

use smerkle_tree::MerkleTree;

use super::ConfigOverrides;
use super::leaves::{build_tree, load_leaves};

async fn tree_from_file(leaves: PathBuf, overrides: &ConfigOverrides) -> eyre::Result<MerkleTree> {
    let config = overrides.resolve().await?;
    let payloads = load_leaves(&leaves, config.leaf_encoding).await?;
    build_tree(Arc::new(payloads), config).await
}

/// Build the tree and print its root, height and leaf count.
///
/// # Errors
/// Returns an error if the configuration or leaf file is invalid.
#[allow(clippy::print_stdout, reason = "Prints the tree summary to stdout")]
pub async fn tree_root(leaves: PathBuf, overrides: ConfigOverrides) -> eyre::Result<()> {
    let tree = tree_from_file(leaves, &overrides).await?;
    println!("root: {}", tree.root());
    println!("height: {}", tree.height());
    println!("leaves: {}", tree.leaf_count());
    Ok(())
}

/// Build the tree and print the width of every level, leaf level first.
///
/// With `digests`, every node digest is printed under its level.
///
/// # Errors
/// Returns an error if the configuration or leaf file is invalid.
#[allow(clippy::print_stdout, reason = "Prints the level listing to stdout")]
pub async fn tree_levels(
    leaves: PathBuf,
    overrides: ConfigOverrides,
    digests: bool,
) -> eyre::Result<()> {
    let tree = tree_from_file(leaves, &overrides).await?;
    for (k, width) in tree.level_sizes().into_iter().enumerate() {
        println!("level {k}: {width}");
        if digests {
            for digest in tree.level(k).unwrap_or_default() {
                println!("  {digest}");
            }
        }
    }
    Ok(())
}
