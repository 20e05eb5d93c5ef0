//! Non-membership proofs built from two inclusion proofs.
//!
//! The leaves must be sorted by key, and the tree's indexes must follow that
//! order. A proof for position `t` carries the inclusion proofs of leaves
//! `t - 1` and `t + 1`; it convinces a verifier only when both proofs reach the
//! root, the two leaves sit exactly two positions apart around `t`, and
//! `prev_key < target_key < next_key`.

use smerkle_core::base::{Digest, HashPrimitive};

use crate::error::TreeError;
use crate::proof::{InclusionProof, ensure_proof_len, verify_proof};
use crate::tree::MerkleTree;

/// Proof that no key exists between two neighbouring leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceProof {
    /// Position bracketed by the two neighbours.
    pub target_index: usize,
    /// Inclusion proof of the predecessor leaf at `target_index - 1`.
    pub prev_proof: InclusionProof,
    /// Inclusion proof of the successor leaf at `target_index + 1`.
    pub next_proof: InclusionProof,
    /// Leaf digest of the predecessor.
    pub prev_leaf_digest: Digest,
    /// Leaf digest of the successor.
    pub next_leaf_digest: Digest,
}

impl AbsenceProof {
    /// Whether the two proofs describe the leaves directly before and after
    /// `target_index`.
    ///
    /// Indexes are read from the proof paths themselves, and must agree with
    /// the declared ones.
    #[must_use]
    pub fn brackets_target(&self) -> bool {
        let (Some(prev), Some(next)) = (self.prev_proof.path_index(), self.next_proof.path_index())
        else {
            return false;
        };
        self.prev_proof.len() == self.next_proof.len()
            && prev == self.prev_proof.leaf_index()
            && next == self.next_proof.leaf_index()
            && Some(prev) == self.target_index.checked_sub(1)
            && Some(next) == self.target_index.checked_add(1)
            && next.checked_sub(prev) == Some(2)
    }
}

impl MerkleTree {
    /// Build the absence proof for position `target_index`.
    ///
    /// # Errors
    /// Returns [`TreeError::UnsupportedBoundary`] when `target_index` has no
    /// predecessor or no successor leaf (the first and last positions, and
    /// anything beyond).
    pub fn generate_absence_proof(&self, target_index: usize) -> Result<AbsenceProof, TreeError> {
        let leaf_count = self.leaf_count();
        let boundary = TreeError::UnsupportedBoundary {
            target_index,
            leaf_count,
        };
        let Some(prev_index) = target_index.checked_sub(1) else {
            return Err(boundary);
        };
        let Some(next_index) = target_index.checked_add(1).filter(|&next| next < leaf_count)
        else {
            return Err(boundary);
        };

        let prev_leaf_digest = self.leaf_digest(prev_index).ok_or(TreeError::IndexOutOfRange {
            index: prev_index,
            leaf_count,
        })?;
        let next_leaf_digest = self.leaf_digest(next_index).ok_or(TreeError::IndexOutOfRange {
            index: next_index,
            leaf_count,
        })?;

        Ok(AbsenceProof {
            target_index,
            prev_proof: self.generate_proof(prev_index)?,
            next_proof: self.generate_proof(next_index)?,
            prev_leaf_digest,
            next_leaf_digest,
        })
    }
}

/// Verify an absence proof against `root` for keys of any ordered type.
///
/// All four conditions must hold: both inclusion proofs reach `root`, the
/// proven leaves are the immediate neighbours of the target position, and
/// `prev_key < target_key < next_key`.
///
/// The keys are not bound to the leaf digests here; see
/// [`verify_absence_of_payload`] for the variant where the keys are the leaf
/// payloads themselves.
#[must_use]
pub fn verify_absence_proof<H, K>(
    hasher: &H,
    proof: &AbsenceProof,
    root: &Digest,
    target_key: &K,
    prev_key: &K,
    next_key: &K,
) -> bool
where
    H: HashPrimitive + ?Sized,
    K: Ord + ?Sized,
{
    let keys_ordered = prev_key < target_key && target_key < next_key;
    keys_ordered
        && proof.brackets_target()
        && verify_proof(hasher, &proof.prev_leaf_digest, &proof.prev_proof, root)
        && verify_proof(hasher, &proof.next_leaf_digest, &proof.next_proof, root)
}

/// Like [`verify_absence_proof`], but first checks both proof lengths against a
/// known tree height.
///
/// # Errors
/// Returns [`TreeError::MalformedProof`] if either inclusion proof does not have
/// `expected_height - 1` steps.
pub fn verify_absence_proof_with_height<H, K>(
    hasher: &H,
    proof: &AbsenceProof,
    root: &Digest,
    target_key: &K,
    prev_key: &K,
    next_key: &K,
    expected_height: usize,
) -> Result<bool, TreeError>
where
    H: HashPrimitive + ?Sized,
    K: Ord + ?Sized,
{
    ensure_proof_len(&proof.prev_proof, expected_height)?;
    ensure_proof_len(&proof.next_proof, expected_height)?;
    Ok(verify_absence_proof(
        hasher, proof, root, target_key, prev_key, next_key,
    ))
}

/// Verify an absence proof where the keys are the leaf payloads.
///
/// On top of [`verify_absence_proof`], the neighbour payloads must hash to the
/// leaf digests carried by the proof. Payloads are ordered lexicographically.
///
/// The leaf stored at `target_index` itself is not covered by the proof: a
/// `target` equal to that leaf still passes. Callers holding the leaf set must
/// rule that case out before trusting the result.
#[must_use]
pub fn verify_absence_of_payload<H>(
    hasher: &H,
    proof: &AbsenceProof,
    root: &Digest,
    target: &[u8],
    prev: &[u8],
    next: &[u8],
) -> bool
where
    H: HashPrimitive + ?Sized,
{
    hasher.hash_leaf(prev) == proof.prev_leaf_digest
        && hasher.hash_leaf(next) == proof.next_leaf_digest
        && verify_absence_proof(hasher, proof, root, target, prev, next)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects, reason = "Tests")]

    use smerkle_core::base::Sm3Hasher;

    use super::*;

    const KEYS: [&str; 6] = ["apple", "banana", "cherry", "grape", "mango", "peach"];

    fn sorted_tree(hasher: &Sm3Hasher) -> MerkleTree {
        MerkleTree::from_leaves(hasher, &KEYS).expect("tree should build")
    }

    #[test]
    fn absence_between_neighbours_verifies() {
        let hasher = Sm3Hasher::new();
        let tree = sorted_tree(&hasher);
        let proof = tree.generate_absence_proof(3).expect("proof should build");

        assert_eq!(proof.prev_proof.leaf_index(), 2);
        assert_eq!(proof.next_proof.leaf_index(), 4);
        assert!(proof.brackets_target());
        assert!(verify_absence_proof(
            &hasher,
            &proof,
            &tree.root(),
            "fig",
            "cherry",
            "mango"
        ));
        assert!(verify_absence_of_payload(
            &hasher,
            &proof,
            &tree.root(),
            b"fig",
            b"cherry",
            b"mango"
        ));
    }

    #[test]
    fn key_order_is_enforced() {
        let hasher = Sm3Hasher::new();
        let tree = sorted_tree(&hasher);
        let proof = tree.generate_absence_proof(3).expect("proof should build");
        let root = tree.root();

        assert!(!verify_absence_proof(&hasher, &proof, &root, "zebra", "cherry", "mango"));
        assert!(!verify_absence_proof(&hasher, &proof, &root, "cherry", "cherry", "mango"));
        assert!(!verify_absence_proof(&hasher, &proof, &root, "fig", "mango", "cherry"));
    }

    #[test]
    fn boundaries_are_unsupported() {
        let hasher = Sm3Hasher::new();
        let tree = sorted_tree(&hasher);

        for target_index in [0, KEYS.len() - 1, KEYS.len(), usize::MAX] {
            assert_eq!(
                tree.generate_absence_proof(target_index),
                Err(TreeError::UnsupportedBoundary {
                    target_index,
                    leaf_count: KEYS.len()
                })
            );
        }
    }

    #[test]
    fn middle_leaf_is_outside_the_proof() {
        let hasher = Sm3Hasher::new();
        let tree = sorted_tree(&hasher);
        let proof = tree.generate_absence_proof(2).expect("proof should build");

        // "cherry" sits at position 2; only the caller can exclude it.
        assert!(verify_absence_of_payload(
            &hasher,
            &proof,
            &tree.root(),
            b"cherry",
            b"banana",
            b"grape"
        ));
    }

    #[test]
    fn payloads_must_match_leaf_digests() {
        let hasher = Sm3Hasher::new();
        let tree = sorted_tree(&hasher);
        let proof = tree.generate_absence_proof(3).expect("proof should build");

        assert!(!verify_absence_of_payload(
            &hasher,
            &proof,
            &tree.root(),
            b"fig",
            b"banana",
            b"mango"
        ));
    }

    #[test]
    fn height_check_reports_malformed_proofs() {
        let hasher = Sm3Hasher::new();
        let tree = sorted_tree(&hasher);
        let proof = tree.generate_absence_proof(2).expect("proof should build");

        assert_eq!(
            verify_absence_proof_with_height(
                &hasher,
                &proof,
                &tree.root(),
                "blueberry",
                "banana",
                "grape",
                tree.height()
            ),
            Ok(true)
        );
        assert_eq!(
            verify_absence_proof_with_height(
                &hasher,
                &proof,
                &tree.root(),
                "blueberry",
                "banana",
                "grape",
                tree.height() + 1
            ),
            Err(TreeError::MalformedProof {
                expected: tree.height(),
                actual: tree.proof_len()
            })
        );
    }
}
