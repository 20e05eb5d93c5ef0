//! Shared test utilities for the workspace.

use smerkle_core::base::Digest;

/// Helper macro to create a vector of owned leaf payloads from string literals.
#[macro_export]
macro_rules! payloads {
    ($($v:expr),* $(,)?) => {{
        let v: Vec<Vec<u8>> = vec![$( Vec::from($v.as_bytes()) ),*];
        v
    }};
}

/// Helper macro to create a sorted vector of owned leaf payloads.
#[macro_export]
macro_rules! sorted_payloads {
    ($($v:expr),* $(,)?) => {{
        let mut v = $crate::payloads!($($v),*);
        v.sort();
        v
    }};
}

/// `count` distinct payloads `leaf-00000000`, `leaf-00000001`, ... in sorted order.
#[must_use]
pub fn numbered_leaves(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("leaf-{i:08}").into_bytes())
        .collect()
}

/// Copy of `digest` with bit `bit` (0..256) flipped.
#[must_use]
#[allow(clippy::arithmetic_side_effects, reason = "Divisor and shift are constant-bounded")]
pub fn flip_bit(digest: &Digest, bit: usize) -> Digest {
    let mut bytes = digest.to_bytes();
    if let Some(byte) = bytes.get_mut(bit / 8) {
        *byte ^= 1 << (bit % 8);
    }
    Digest::new(bytes)
}
