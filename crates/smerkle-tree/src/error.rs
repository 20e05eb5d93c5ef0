//! Error taxonomy shared by tree construction and proof handling.

use thiserror::Error;

/// Errors that can occur when building a tree or working with its proofs.
///
/// A proof that simply fails to verify is not an error: verification returns
/// `false` for cryptographic mismatches.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The leaf set is empty.
    #[error("Cannot build a tree from an empty leaf set")]
    InvalidInput,

    /// A leaf index outside `[0, leaf_count)`.
    #[error("Leaf index {index} is out of range for {leaf_count} leaves")]
    IndexOutOfRange {
        /// The requested leaf index.
        index: usize,
        /// Number of leaves in the tree.
        leaf_count: usize,
    },

    /// Absence proof requested where no predecessor or successor leaf exists.
    #[error(
        "Absence proof at position {target_index} needs a predecessor and a successor among {leaf_count} leaves"
    )]
    UnsupportedBoundary {
        /// The requested target position.
        target_index: usize,
        /// Number of leaves in the tree.
        leaf_count: usize,
    },

    /// The proof length does not match the expected tree height.
    #[error("Proof has {actual} steps, expected {expected}")]
    MalformedProof {
        /// Expected number of steps (`height - 1`).
        expected: usize,
        /// Number of steps in the proof.
        actual: usize,
    },
}
