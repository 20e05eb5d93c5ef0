//! Leaf file loading and tree construction.

use std::path::Path;
use std::sync::Arc;

use eyre::{Context as _, ensure};
use smerkle_core::base::AnyHasher;
use smerkle_core::schema::config::{LeafEncoding, TreeConfig};
use smerkle_tree::{MerkleTree, TreeBuilder};
use tracing::info;

/// Decode one line of a leaf file, or a key given on the command line.
///
/// # Errors
/// Returns an error if a hex line is not valid hex.
pub fn decode_payload(line: &str, encoding: LeafEncoding) -> eyre::Result<Vec<u8>> {
    match encoding {
        LeafEncoding::Utf8 => Ok(line.as_bytes().to_vec()),
        LeafEncoding::Hex => Ok(hex::decode(line.trim())?),
    }
}

/// Split a leaf file into payloads, one per line.
///
/// Trailing carriage returns are dropped. A trailing newline does not add an
/// empty leaf, but empty lines in the middle of the file are kept.
///
/// # Errors
/// Returns an error naming the offending line if a payload cannot be decoded.
pub fn parse_leaves(contents: &str, encoding: LeafEncoding) -> eyre::Result<Vec<Vec<u8>>> {
    contents
        .lines()
        .enumerate()
        .map(|(i, line)| {
            decode_payload(line, encoding)
                .with_context(|| format!("Invalid leaf on line {}", i.saturating_add(1)))
        })
        .collect()
}

/// Read and decode a leaf file.
///
/// # Errors
/// Returns an error if the file cannot be read, is empty, or holds an invalid line.
pub async fn load_leaves(path: &Path, encoding: LeafEncoding) -> eyre::Result<Vec<Vec<u8>>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read leaf file {}", path.display()))?;
    let leaves = parse_leaves(&contents, encoding)?;
    ensure!(!leaves.is_empty(), "Leaf file {} is empty", path.display());
    info!(count = leaves.len(), file = %path.display(), "Loaded leaves");
    Ok(leaves)
}

/// Build the tree on a blocking thread, logging progress per level.
///
/// # Errors
/// Returns an error if the build task fails or the leaf set is rejected.
pub async fn build_tree(
    leaves: Arc<Vec<Vec<u8>>>,
    config: TreeConfig,
) -> eyre::Result<MerkleTree> {
    info!(hash = %config.hash, parallel = config.parallel, "Building tree");
    let tree = tokio::task::spawn_blocking(move || {
        let hasher = AnyHasher::from(config.hash);
        TreeBuilder::new(&hasher)
            .parallel(config.parallel)
            .build_with_progress(leaves.as_slice(), |done, total| {
                info!("Hashed {done} of {total} nodes");
            })
    })
    .await
    .context("Tree build task failed")??;
    info!(root = %tree.root(), height = tree.height(), "Tree built");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_lines_become_payloads() {
        let leaves = parse_leaves("apple\nbanana\r\ncherry\n", LeafEncoding::Utf8)
            .expect("leaves should parse");
        assert_eq!(
            leaves,
            vec![b"apple".to_vec(), b"banana".to_vec(), b"cherry".to_vec()]
        );
    }

    #[test]
    fn hex_lines_are_decoded() {
        let leaves = parse_leaves("00ff\ncafe\n", LeafEncoding::Hex).expect("leaves should parse");
        assert_eq!(leaves, vec![vec![0x00, 0xff], vec![0xca, 0xfe]]);
    }

    #[test]
    fn invalid_hex_names_the_line() {
        let err = parse_leaves("00ff\nzz\n", LeafEncoding::Hex).expect_err("line 2 is not hex");
        assert!(err.to_string().contains("line 2"));
    }

    #[tokio::test]
    async fn build_tree_matches_direct_build() {
        let leaves = Arc::new(vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        let config = TreeConfig::default();
        let tree = build_tree(Arc::clone(&leaves), config)
            .await
            .expect("tree should build");

        let hasher = AnyHasher::from(config.hash);
        let direct = MerkleTree::from_leaves(&hasher, leaves.as_slice()).expect("tree should build");
        assert_eq!(tree.root(), direct.root());
    }
}
