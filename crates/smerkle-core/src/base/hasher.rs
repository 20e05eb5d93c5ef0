//! Domain-separated hash primitives.
//!
//! Leaves and internal nodes are hashed with distinct one-byte prefixes, as in
//! RFC 6962, so a digest valid for one node type can never be replayed as the
//! other:
//!
//! - `hash_leaf(payload) = H(0x00 || payload)`
//! - `hash_internal(left, right) = H(0x01 || left || right)`

use std::fmt;
use std::marker::PhantomData;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha2::digest::consts::U32;
use sha2::digest::{Digest as HashFunction, OutputSizeUser};
use sm3::Sm3;

use super::digest::Digest;

/// Prefix byte for leaf hashing.
pub const LEAF_PREFIX: u8 = 0x00;

/// Prefix byte for internal node hashing.
pub const INTERNAL_PREFIX: u8 = 0x01;

/// A deterministic, collision-resistant hash with separate leaf and node domains.
///
/// Tree construction and proof verification only ever go through this trait.
pub trait HashPrimitive: Send + Sync {
    /// Hash a leaf payload.
    fn hash_leaf(&self, payload: &[u8]) -> Digest;

    /// Hash two child digests into their parent.
    fn hash_internal(&self, left: &Digest, right: &Digest) -> Digest;
}

impl<H: HashPrimitive + ?Sized> HashPrimitive for &H {
    fn hash_leaf(&self, payload: &[u8]) -> Digest {
        (**self).hash_leaf(payload)
    }

    fn hash_internal(&self, left: &Digest, right: &Digest) -> Digest {
        (**self).hash_internal(left, right)
    }
}

/// RFC 6962 style hasher over any 32-byte RustCrypto hash function.
pub struct Rfc6962Hasher<D>(PhantomData<fn() -> D>);

/// SHA-256 backend.
pub type Sha256Hasher = Rfc6962Hasher<Sha256>;

/// SM3 backend.
pub type Sm3Hasher = Rfc6962Hasher<Sm3>;

impl<D> Rfc6962Hasher<D> {
    /// Create a new hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<D> Default for Rfc6962Hasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for Rfc6962Hasher<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Rfc6962Hasher<D> {}

impl<D> fmt::Debug for Rfc6962Hasher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rfc6962Hasher")
    }
}

impl<D> HashPrimitive for Rfc6962Hasher<D>
where
    D: HashFunction + OutputSizeUser<OutputSize = U32>,
{
    fn hash_leaf(&self, payload: &[u8]) -> Digest {
        let mut hasher = D::new();
        hasher.update([LEAF_PREFIX]);
        hasher.update(payload);
        Digest::new(hasher.finalize().into())
    }

    fn hash_internal(&self, left: &Digest, right: &Digest) -> Digest {
        let mut hasher = D::new();
        hasher.update([INTERNAL_PREFIX]);
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        Digest::new(hasher.finalize().into())
    }
}

/// Hash function selection.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SM3 (GB/T 32905-2016).
    #[default]
    Sm3,
    /// SHA-256 (FIPS 180-4).
    Sha256,
}

impl HashAlgorithm {
    /// Lowercase algorithm name, as used on the command line and in config files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sm3 => "sm3",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A hasher chosen at runtime from a [`HashAlgorithm`].
#[derive(Debug, Clone, Copy)]
pub enum AnyHasher {
    /// SM3 backend.
    Sm3(Sm3Hasher),
    /// SHA-256 backend.
    Sha256(Sha256Hasher),
}

impl AnyHasher {
    /// The algorithm this hasher dispatches to.
    #[must_use]
    pub const fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Sm3(_) => HashAlgorithm::Sm3,
            Self::Sha256(_) => HashAlgorithm::Sha256,
        }
    }
}

impl From<HashAlgorithm> for AnyHasher {
    fn from(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sm3 => Self::Sm3(Sm3Hasher::new()),
            HashAlgorithm::Sha256 => Self::Sha256(Sha256Hasher::new()),
        }
    }
}

impl HashPrimitive for AnyHasher {
    fn hash_leaf(&self, payload: &[u8]) -> Digest {
        match self {
            Self::Sm3(hasher) => hasher.hash_leaf(payload),
            Self::Sha256(hasher) => hasher.hash_leaf(payload),
        }
    }

    fn hash_internal(&self, left: &Digest, right: &Digest) -> Digest {
        match self {
            Self::Sm3(hasher) => hasher.hash_internal(left, right),
            Self::Sha256(hasher) => hasher.hash_internal(left, right),
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn sha256_empty_leaf_matches_rfc6962() {
        let hasher = Sha256Hasher::new();
        assert_eq!(
            hasher.hash_leaf(b""),
            Digest::new(hex!(
                "6e340b9cffb37a989ca544e6bb780a2c78901d3fb33738768511a30617afa01d"
            ))
        );
    }

    #[test]
    fn sm3_backend_is_plain_sm3_over_prefixed_input() {
        // Standard SM3 test vector, used to pin the backend itself.
        assert_eq!(
            <[u8; 32]>::from(Sm3::digest(b"abc")),
            hex!("66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0")
        );

        let hasher = Sm3Hasher::new();
        let expected: [u8; 32] = Sm3::digest(b"\x00abc").into();
        assert_eq!(hasher.hash_leaf(b"abc"), Digest::new(expected));
    }

    #[test]
    fn leaf_and_internal_domains_are_disjoint() {
        let hasher = Sm3Hasher::new();
        let left = hasher.hash_leaf(b"left");
        let right = hasher.hash_leaf(b"right");

        let mut concatenated = Vec::new();
        concatenated.extend_from_slice(left.as_bytes());
        concatenated.extend_from_slice(right.as_bytes());

        assert_ne!(
            hasher.hash_internal(&left, &right),
            hasher.hash_leaf(&concatenated)
        );
    }

    #[test]
    fn internal_hash_is_order_sensitive() {
        let hasher = Sha256Hasher::new();
        let a = hasher.hash_leaf(b"a");
        let b = hasher.hash_leaf(b"b");
        assert_ne!(hasher.hash_internal(&a, &b), hasher.hash_internal(&b, &a));
    }

    #[test]
    fn any_hasher_dispatches_to_selected_backend() {
        let sm3 = AnyHasher::from(HashAlgorithm::Sm3);
        let sha = AnyHasher::from(HashAlgorithm::Sha256);

        assert_eq!(sm3.algorithm(), HashAlgorithm::Sm3);
        assert_eq!(sha.algorithm(), HashAlgorithm::Sha256);
        assert_eq!(sm3.hash_leaf(b"x"), Sm3Hasher::new().hash_leaf(b"x"));
        assert_eq!(sha.hash_leaf(b"x"), Sha256Hasher::new().hash_leaf(b"x"));
        assert_ne!(sm3.hash_leaf(b"x"), sha.hash_leaf(b"x"));
    }

    #[test]
    fn default_algorithm_is_sm3() {
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sm3);
        assert_eq!(HashAlgorithm::Sha256.to_string(), "sha256");
    }
}
