//! `proof` subcommands: generate a proof and check it against the tree root.

use std::path::PathBuf;
use std::sync::Arc;

use eyre::{ContextCompat as _, ensure};
use smerkle_core::base::{AnyHasher, HashPrimitive as _};
use smerkle_tree::{
    AbsenceProof, InclusionProof, verify_absence_of_payload, verify_absence_proof_with_height,
    verify_proof_with_height,
};
use tracing::info;

use super::ConfigOverrides;
use super::leaves::{build_tree, decode_payload, load_leaves};

#[allow(clippy::print_stdout, reason = "Prints proof steps to stdout")]
fn print_steps(label: &str, proof: &InclusionProof) {
    println!("{label} leaf index: {}", proof.leaf_index());
    for (level, step) in proof.steps().iter().enumerate() {
        match step.digest() {
            Some(digest) => println!("  {level}: {} {digest}", step.side()),
            None => println!("  {level}: {}", step.side()),
        }
    }
}

/// Generate the inclusion proof of leaf `index`, verify it and print it.
///
/// # Errors
/// Returns an error if `index` is out of range or the proof does not verify.
#[allow(clippy::print_stdout, reason = "Prints the proof to stdout")]
pub async fn prove_inclusion(
    leaves: PathBuf,
    overrides: ConfigOverrides,
    index: usize,
) -> eyre::Result<()> {
    let config = overrides.resolve().await?;
    let payloads = Arc::new(load_leaves(&leaves, config.leaf_encoding).await?);
    let tree = build_tree(Arc::clone(&payloads), config).await?;

    let proof = tree.generate_proof(index)?;
    let hasher = AnyHasher::from(config.hash);
    let payload = payloads
        .get(index)
        .context("Leaf index checked by proof generation")?;
    let leaf_digest = hasher.hash_leaf(payload);
    let valid =
        verify_proof_with_height(&hasher, &leaf_digest, &proof, &tree.root(), tree.height())?;
    ensure!(valid, "Inclusion proof for leaf {index} does not verify");
    info!(index, steps = proof.len(), "Inclusion proof verified");

    println!("root: {}", tree.root());
    println!("leaf digest: {leaf_digest}");
    print_steps("inclusion", &proof);
    Ok(())
}

/// Generate the absence proof for `target` at `target_index`, verify it and print it.
///
/// The neighbours at `target_index - 1` and `target_index + 1` act as the
/// bracketing keys; the leaf file is expected to be sorted.
///
/// # Errors
/// Returns an error if `target_index` is a boundary position, `target` is the
/// leaf at `target_index`, `target` is not strictly between the neighbours, or
/// the proof does not verify.
#[allow(clippy::print_stdout, reason = "Prints the proof to stdout")]
pub async fn prove_absence(
    leaves: PathBuf,
    overrides: ConfigOverrides,
    target_index: usize,
    target: String,
) -> eyre::Result<()> {
    let config = overrides.resolve().await?;
    let target = decode_payload(&target, config.leaf_encoding)?;
    let payloads = Arc::new(load_leaves(&leaves, config.leaf_encoding).await?);
    let tree = build_tree(Arc::clone(&payloads), config).await?;

    let proof = tree.generate_absence_proof(target_index)?;
    ensure!(
        payloads.get(target_index) != Some(&target),
        "Target {} is the leaf at position {target_index}",
        hex::encode(&target)
    );
    let (prev, next) = neighbours(&payloads, &proof)?;
    let hasher = AnyHasher::from(config.hash);
    let root = tree.root();

    let valid = verify_absence_proof_with_height(
        &hasher,
        &proof,
        &root,
        target.as_slice(),
        prev,
        next,
        tree.height(),
    )? && verify_absence_of_payload(&hasher, &proof, &root, &target, prev, next);
    ensure!(
        valid,
        "Absence proof for target {} at position {target_index} does not verify",
        hex::encode(&target)
    );
    info!(target_index, "Absence proof verified");

    println!("root: {root}");
    println!("target: {}", hex::encode(&target));
    println!("prev leaf digest: {}", proof.prev_leaf_digest);
    println!("next leaf digest: {}", proof.next_leaf_digest);
    print_steps("prev", &proof.prev_proof);
    print_steps("next", &proof.next_proof);
    Ok(())
}

fn neighbours<'a>(
    payloads: &'a [Vec<u8>],
    proof: &AbsenceProof,
) -> eyre::Result<(&'a [u8], &'a [u8])> {
    let prev = payloads
        .get(proof.prev_proof.leaf_index())
        .map(Vec::as_slice)
        .context("Missing predecessor leaf")?;
    let next = payloads
        .get(proof.next_proof.leaf_index())
        .map(Vec::as_slice)
        .context("Missing successor leaf")?;
    Ok((prev, next))
}
