//! Proof subcommands.

use super::TreeArgs;

/// Proof command group.
#[derive(Debug, clap::Subcommand)]
pub enum ProofCommands {
    /// Generate the inclusion proof of a leaf and verify it against the root.
    Inclusion {
        #[command(flatten)]
        args: TreeArgs,
        /// Zero-based index of the leaf.
        #[arg(long)]
        index: usize,
    },
    /// Prove that a key is absent between the leaves around a position.
    ///
    /// The leaf file must be sorted. The leaves at `target-index - 1` and
    /// `target-index + 1` are the bracketing neighbours of `target`.
    #[command(verbatim_doc_comment)]
    Absence {
        #[command(flatten)]
        args: TreeArgs,
        /// Zero-based position bracketed by the two neighbours.
        #[arg(long)]
        target_index: usize,
        /// The absent key, in the leaf encoding.
        #[arg(long)]
        target: String,
    },
}
