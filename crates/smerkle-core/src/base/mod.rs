//! Foundational primitive types: the 32-byte digest and the hash backends.

mod digest;
mod hasher;

pub use digest::{DIGEST_SIZE, Digest, DigestParseError};
pub use hasher::{
    AnyHasher, HashAlgorithm, HashPrimitive, INTERNAL_PREFIX, LEAF_PREFIX, Rfc6962Hasher,
    Sha256Hasher, Sm3Hasher,
};
