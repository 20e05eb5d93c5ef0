//! Level-by-level tree construction.

use smerkle_core::base::{Digest, HashPrimitive};

use crate::error::TreeError;

/// Levels narrower than this are hashed on the calling thread even when
/// parallel hashing is requested.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_LEVEL_WIDTH: usize = 1024;

/// Number of levels of a tree with `leaf_count` leaves, counting the leaf level.
///
/// Returns `None` for an empty leaf set.
#[must_use]
pub fn height_for(leaf_count: usize) -> Option<usize> {
    if leaf_count == 0 {
        return None;
    }
    let mut width = leaf_count;
    let mut height = 1_usize;
    while width > 1 {
        width = width.div_ceil(2);
        height = height.saturating_add(1);
    }
    Some(height)
}

/// Width of every level of a tree with `leaf_count` leaves, leaves first.
///
/// Returns an empty vector for an empty leaf set.
#[must_use]
pub fn level_widths(leaf_count: usize) -> Vec<usize> {
    let mut widths = Vec::new();
    if leaf_count == 0 {
        return widths;
    }
    let mut width = leaf_count;
    widths.push(width);
    while width > 1 {
        width = width.div_ceil(2);
        widths.push(width);
    }
    widths
}

/// An immutable Merkle tree.
///
/// Level 0 holds the leaf digests and the last level holds only the root.
/// The tree has no mutation operations; a payload change requires a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Digest>>,
    root: Digest,
}

impl MerkleTree {
    /// Build a tree from an ordered, non-empty sequence of leaf payloads.
    ///
    /// # Errors
    /// Returns [`TreeError::InvalidInput`] if `leaves` is empty.
    pub fn from_leaves<H, P>(hasher: &H, leaves: &[P]) -> Result<Self, TreeError>
    where
        H: HashPrimitive + ?Sized,
        P: AsRef<[u8]> + Sync,
    {
        TreeBuilder::new(hasher).build(leaves)
    }

    /// Like [`MerkleTree::from_leaves`], reporting `(hashed_nodes, total_nodes)`
    /// as construction advances.
    ///
    /// # Errors
    /// Returns [`TreeError::InvalidInput`] if `leaves` is empty.
    pub fn from_leaves_with_progress<H, P>(
        hasher: &H,
        leaves: &[P],
        on_progress: impl FnMut(usize, usize),
    ) -> Result<Self, TreeError>
    where
        H: HashPrimitive + ?Sized,
        P: AsRef<[u8]> + Sync,
    {
        TreeBuilder::new(hasher).build_with_progress(leaves, on_progress)
    }

    /// The root digest.
    #[must_use]
    pub const fn root(&self) -> Digest {
        self.root
    }

    /// Number of levels, counting both the leaf level and the root level.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.levels.len()
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Width of every level, leaves first.
    #[must_use]
    pub fn level_sizes(&self) -> Vec<usize> {
        self.levels.iter().map(Vec::len).collect()
    }

    /// The digests of level `level`, or `None` above the root.
    #[must_use]
    pub fn level(&self, level: usize) -> Option<&[Digest]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    /// The digest of leaf `index`, or `None` if the index is out of range.
    #[must_use]
    pub fn leaf_digest(&self, index: usize) -> Option<Digest> {
        self.levels.first()?.get(index).copied()
    }

    /// Number of steps every inclusion proof of this tree has.
    #[must_use]
    pub const fn proof_len(&self) -> usize {
        self.height().saturating_sub(1)
    }

    pub(crate) fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }
}

/// Builds a [`MerkleTree`] with a given hash primitive.
#[derive(Debug)]
pub struct TreeBuilder<'h, H: ?Sized> {
    hasher: &'h H,
    parallel: bool,
}

impl<'h, H> TreeBuilder<'h, H>
where
    H: HashPrimitive + ?Sized,
{
    /// Create a sequential builder.
    #[must_use]
    pub const fn new(hasher: &'h H) -> Self {
        Self {
            hasher,
            parallel: false,
        }
    }

    /// Hash the nodes of each level in parallel.
    ///
    /// Without the `parallel` feature this is ignored and the tree is built
    /// sequentially. Both paths produce identical trees.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Build the tree.
    ///
    /// # Errors
    /// Returns [`TreeError::InvalidInput`] if `leaves` is empty.
    pub fn build<P>(&self, leaves: &[P]) -> Result<MerkleTree, TreeError>
    where
        P: AsRef<[u8]> + Sync,
    {
        self.build_with_progress(leaves, |_, _| {})
    }

    /// Build the tree, reporting `(hashed_nodes, total_nodes)` at the start,
    /// roughly every 10%, and on completion.
    ///
    /// # Errors
    /// Returns [`TreeError::InvalidInput`] if `leaves` is empty.
    pub fn build_with_progress<P>(
        &self,
        leaves: &[P],
        mut on_progress: impl FnMut(usize, usize),
    ) -> Result<MerkleTree, TreeError>
    where
        P: AsRef<[u8]> + Sync,
    {
        if leaves.is_empty() {
            return Err(TreeError::InvalidInput);
        }
        let _span = tracing::info_span!(
            "build_tree",
            leaf_count = leaves.len(),
            parallel = self.parallel
        )
        .entered();
        let widths = level_widths(leaves.len());
        let total_nodes: usize = widths.iter().sum();
        let mut done = 0_usize;
        let mut last_pct = 0_usize;
        on_progress(0, total_nodes);

        let mut levels = Vec::with_capacity(widths.len());
        let leaf_level = if self.use_parallel(leaves.len()) {
            self.hash_leaves_parallel(leaves)
        } else {
            let mut digests = Vec::with_capacity(leaves.len());
            for payload in leaves {
                digests.push(self.hasher.hash_leaf(payload.as_ref()));
                done = done.saturating_add(1);
                if should_report_progress(done, total_nodes, &mut last_pct) {
                    on_progress(done, total_nodes);
                }
            }
            digests
        };
        done = leaf_level.len();
        tracing::debug!(leaf_count = leaf_level.len(), "hashed leaf level");
        levels.push(leaf_level);

        // Each level is fully materialized before the next one starts.
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next = if self.use_parallel(current.len()) {
                self.combine_level_parallel(current)
            } else {
                combine_level(self.hasher, current)
            };
            done = done.saturating_add(next.len());
            tracing::debug!(level = levels.len(), width = next.len(), "built tree level");
            levels.push(next);
            if should_report_progress(done, total_nodes, &mut last_pct) {
                on_progress(done, total_nodes);
            }
        }

        if last_pct < 100 {
            on_progress(done, total_nodes);
        }

        let root = levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .ok_or(TreeError::InvalidInput)?;
        tracing::debug!(height = levels.len(), %root, "built tree");
        Ok(MerkleTree { levels, root })
    }

    #[cfg(feature = "parallel")]
    const fn use_parallel(&self, width: usize) -> bool {
        self.parallel && width >= PARALLEL_MIN_LEVEL_WIDTH
    }

    #[cfg(not(feature = "parallel"))]
    const fn use_parallel(&self, _width: usize) -> bool {
        let _ = self.parallel;
        false
    }

    #[cfg(feature = "parallel")]
    fn hash_leaves_parallel<P>(&self, leaves: &[P]) -> Vec<Digest>
    where
        P: AsRef<[u8]> + Sync,
    {
        use rayon::prelude::*;
        leaves
            .par_iter()
            .map(|payload| self.hasher.hash_leaf(payload.as_ref()))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn hash_leaves_parallel<P>(&self, leaves: &[P]) -> Vec<Digest>
    where
        P: AsRef<[u8]> + Sync,
    {
        leaves
            .iter()
            .map(|payload| self.hasher.hash_leaf(payload.as_ref()))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn combine_level_parallel(&self, current: &[Digest]) -> Vec<Digest> {
        use rayon::prelude::*;
        current
            .par_chunks(2)
            .filter_map(|pair| combine_pair(self.hasher, pair))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn combine_level_parallel(&self, current: &[Digest]) -> Vec<Digest> {
        combine_level(self.hasher, current)
    }
}

fn combine_level<H>(hasher: &H, current: &[Digest]) -> Vec<Digest>
where
    H: HashPrimitive + ?Sized,
{
    current
        .chunks(2)
        .filter_map(|pair| combine_pair(hasher, pair))
        .collect()
}

/// Decide whether progress moved at least 10 percentage points since the last report.
const fn should_report_progress(current: usize, total: usize, last_pct: &mut usize) -> bool {
    if total == 0 {
        return false;
    }
    #[allow(clippy::arithmetic_side_effects)]
    let pct = current.saturating_mul(100).saturating_div(total);
    if pct >= last_pct.saturating_add(10) {
        *last_pct = pct;
        true
    } else {
        false
    }
}

/// Hash a pair into its parent, or promote a trailing unpaired node verbatim.
fn combine_pair<H>(hasher: &H, pair: &[Digest]) -> Option<Digest>
where
    H: HashPrimitive + ?Sized,
{
    let (left, rest) = pair.split_first()?;
    Some(match rest.first() {
        Some(right) => hasher.hash_internal(left, right),
        None => *left,
    })
}
