//! Inclusion proofs: generation from a tree and root recomputation.

use std::fmt;

use smerkle_core::base::{Digest, HashPrimitive};

use crate::error::TreeError;
use crate::tree::MerkleTree;

/// Position of a sibling relative to the node on the proof path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The sibling is the left child; the path node is the right child.
    Left,
    /// The sibling is the right child; the path node is the left child.
    Right,
    /// The path node had no sibling and was promoted unchanged.
    Absent,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Absent => "absent",
        })
    }
}

/// One level of an inclusion proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiblingStep {
    /// Sibling digest sitting to the left of the path node.
    Left(Digest),
    /// Sibling digest sitting to the right of the path node.
    Right(Digest),
    /// No sibling at this level: the path node was promoted.
    Absent,
}

impl SiblingStep {
    /// Which side the sibling occupies.
    #[must_use]
    pub const fn side(&self) -> Side {
        match self {
            Self::Left(_) => Side::Left,
            Self::Right(_) => Side::Right,
            Self::Absent => Side::Absent,
        }
    }

    /// The sibling digest, if there is one.
    #[must_use]
    pub const fn digest(&self) -> Option<&Digest> {
        match self {
            Self::Left(digest) | Self::Right(digest) => Some(digest),
            Self::Absent => None,
        }
    }

    /// Fold this step into the running path digest.
    fn apply<H>(&self, hasher: &H, current: Digest) -> Digest
    where
        H: HashPrimitive + ?Sized,
    {
        match self {
            Self::Left(sibling) => hasher.hash_internal(sibling, &current),
            Self::Right(sibling) => hasher.hash_internal(&current, sibling),
            Self::Absent => current,
        }
    }
}

/// Ordered sibling path from a leaf up to, but excluding, the root level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InclusionProof {
    leaf_index: usize,
    steps: Vec<SiblingStep>,
}

impl InclusionProof {
    /// Create a proof from its parts.
    #[must_use]
    pub const fn new(leaf_index: usize, steps: Vec<SiblingStep>) -> Self {
        Self { leaf_index, steps }
    }

    /// Index of the leaf this proof was generated for.
    ///
    /// Informational only; root recomputation never reads it.
    #[must_use]
    pub const fn leaf_index(&self) -> usize {
        self.leaf_index
    }

    /// The steps, leaf level first.
    #[must_use]
    pub fn steps(&self) -> &[SiblingStep] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the proof has no steps (single-leaf tree).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The leaf index encoded by the step sides.
    ///
    /// Bit `k` is set iff the sibling at level `k` is on the left. A promoted
    /// node is always the trailing even index of its level, so `Absent` encodes
    /// a zero bit. Returns `None` if the path is too long for `usize`.
    #[must_use]
    pub fn path_index(&self) -> Option<usize> {
        let mut index = 0_usize;
        for (level, step) in self.steps.iter().enumerate() {
            let bit = 1_usize.checked_shl(u32::try_from(level).ok()?)?;
            if step.side() == Side::Left {
                index |= bit;
            }
        }
        Some(index)
    }
}

impl MerkleTree {
    /// Derive the inclusion proof of leaf `leaf_index`.
    ///
    /// The proof always has exactly `height - 1` steps.
    ///
    /// # Errors
    /// Returns [`TreeError::IndexOutOfRange`] if `leaf_index >= leaf_count`.
    pub fn generate_proof(&self, leaf_index: usize) -> Result<InclusionProof, TreeError> {
        if leaf_index >= self.leaf_count() {
            return Err(TreeError::IndexOutOfRange {
                index: leaf_index,
                leaf_count: self.leaf_count(),
            });
        }

        let below_root = self
            .levels()
            .split_last()
            .map_or(&[][..], |(_, below)| below);
        let mut steps = Vec::with_capacity(below_root.len());
        let mut current = leaf_index;
        for level in below_root {
            let is_right_child = current & 1 == 1;
            let step = match level.get(current ^ 1) {
                Some(sibling) if is_right_child => SiblingStep::Left(*sibling),
                Some(sibling) => SiblingStep::Right(*sibling),
                None => SiblingStep::Absent,
            };
            steps.push(step);
            current >>= 1_u32;
        }

        Ok(InclusionProof::new(leaf_index, steps))
    }
}

/// Recompute the root implied by `leaf_digest` and `proof`.
#[must_use]
pub fn compute_root<H>(hasher: &H, leaf_digest: &Digest, proof: &InclusionProof) -> Digest
where
    H: HashPrimitive + ?Sized,
{
    proof
        .steps
        .iter()
        .fold(*leaf_digest, |current, step| step.apply(hasher, current))
}

/// Check that `proof` links `leaf_digest` to `root`.
///
/// A mismatch is reported as `false`, never as an error.
#[must_use]
pub fn verify_proof<H>(hasher: &H, leaf_digest: &Digest, proof: &InclusionProof, root: &Digest) -> bool
where
    H: HashPrimitive + ?Sized,
{
    compute_root(hasher, leaf_digest, proof) == *root
}

/// Like [`verify_proof`], but first checks the proof length against a known tree height.
///
/// Use this whenever the height is known: without it, a proof starting from an
/// internal node (or padded with `Absent` steps) can still reach the root.
///
/// # Errors
/// Returns [`TreeError::MalformedProof`] if the proof does not have
/// `expected_height - 1` steps.
pub fn verify_proof_with_height<H>(
    hasher: &H,
    leaf_digest: &Digest,
    proof: &InclusionProof,
    root: &Digest,
    expected_height: usize,
) -> Result<bool, TreeError>
where
    H: HashPrimitive + ?Sized,
{
    ensure_proof_len(proof, expected_height)?;
    Ok(verify_proof(hasher, leaf_digest, proof, root))
}

pub(crate) fn ensure_proof_len(
    proof: &InclusionProof,
    expected_height: usize,
) -> Result<(), TreeError> {
    let expected = expected_height.saturating_sub(1);
    if expected_height == 0 || proof.len() != expected {
        return Err(TreeError::MalformedProof {
            expected,
            actual: proof.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use smerkle_core::base::Sm3Hasher;

    use super::*;

    fn tree(hasher: &Sm3Hasher, leaves: &[&str]) -> MerkleTree {
        MerkleTree::from_leaves(hasher, leaves).expect("tree should build")
    }

    #[test]
    fn sides_record_where_the_sibling_sits() {
        let hasher = Sm3Hasher::new();
        let tree = tree(&hasher, &["a", "b", "c", "d"]);
        let a = hasher.hash_leaf(b"a");
        let b = hasher.hash_leaf(b"b");
        let cd = hasher.hash_internal(&hasher.hash_leaf(b"c"), &hasher.hash_leaf(b"d"));

        let proof = tree.generate_proof(1).expect("proof should build");
        assert_eq!(proof.steps(), &[SiblingStep::Left(a), SiblingStep::Right(cd)]);

        let proof = tree.generate_proof(0).expect("proof should build");
        assert_eq!(proof.steps(), &[SiblingStep::Right(b), SiblingStep::Right(cd)]);
    }

    #[test]
    fn promoted_leaf_has_absent_steps() {
        let hasher = Sm3Hasher::new();
        let tree = tree(&hasher, &["a", "b", "c", "d", "e"]);
        let proof = tree.generate_proof(4).expect("proof should build");

        let sides: Vec<Side> = proof.steps().iter().map(SiblingStep::side).collect();
        assert_eq!(sides, vec![Side::Absent, Side::Absent, Side::Left]);
        assert_eq!(proof.steps().first().and_then(SiblingStep::digest), None);
        assert!(verify_proof(&hasher, &hasher.hash_leaf(b"e"), &proof, &tree.root()));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let hasher = Sm3Hasher::new();
        let tree = tree(&hasher, &["a", "b", "c"]);
        assert_eq!(
            tree.generate_proof(3),
            Err(TreeError::IndexOutOfRange {
                index: 3,
                leaf_count: 3
            })
        );
    }

    #[test]
    fn single_leaf_proof_is_empty() {
        let hasher = Sm3Hasher::new();
        let tree = tree(&hasher, &["solo"]);
        let proof = tree.generate_proof(0).expect("proof should build");

        assert!(proof.is_empty());
        assert!(verify_proof(&hasher, &hasher.hash_leaf(b"solo"), &proof, &tree.root()));
    }

    #[test]
    fn path_index_matches_leaf_index() {
        let hasher = Sm3Hasher::new();
        let leaves = ["a", "b", "c", "d", "e", "f", "g"];
        let tree = tree(&hasher, &leaves);
        for index in 0..leaves.len() {
            let proof = tree.generate_proof(index).expect("proof should build");
            assert_eq!(proof.path_index(), Some(index));
            assert_eq!(proof.leaf_index(), index);
        }
    }

    #[test]
    fn wrong_length_is_malformed_not_false() {
        let hasher = Sm3Hasher::new();
        let tree = tree(&hasher, &["a", "b", "c", "d", "e"]);
        let mut proof = tree.generate_proof(2).expect("proof should build");
        let leaf = hasher.hash_leaf(b"c");

        assert_eq!(
            verify_proof_with_height(&hasher, &leaf, &proof, &tree.root(), tree.height()),
            Ok(true)
        );
        assert_eq!(
            verify_proof_with_height(&hasher, &leaf, &proof, &tree.root(), 0),
            Err(TreeError::MalformedProof {
                expected: 0,
                actual: 3
            })
        );

        // Padding with no-op steps still reaches the root, but not the expected length.
        proof.steps.push(SiblingStep::Absent);
        assert!(verify_proof(&hasher, &leaf, &proof, &tree.root()));
        assert_eq!(
            verify_proof_with_height(&hasher, &leaf, &proof, &tree.root(), tree.height()),
            Err(TreeError::MalformedProof {
                expected: 3,
                actual: 4
            })
        );
    }
}
