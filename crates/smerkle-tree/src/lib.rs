//! Merkle hash tree with inclusion and absence proofs.
//!
//! Leaves are hashed as `H(0x00 || payload)` and internal nodes as
//! `H(0x01 || left || right)`. A trailing unpaired node is promoted to the next
//! level unchanged instead of being duplicated and rehashed; proofs mark such
//! levels with [`SiblingStep::Absent`].

mod absence;
mod error;
mod proof;
mod tree;

pub use absence::{
    AbsenceProof, verify_absence_of_payload, verify_absence_proof,
    verify_absence_proof_with_height,
};
pub use error::TreeError;
pub use proof::{InclusionProof, Side, SiblingStep, compute_root, verify_proof, verify_proof_with_height};
pub use smerkle_core::base::{Digest, HashPrimitive};
pub use tree::{MerkleTree, TreeBuilder, height_for, level_widths};
