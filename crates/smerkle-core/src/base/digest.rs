//! The fixed-size digest produced by every hash primitive.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Size of a digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// A 32-byte hash output.
///
/// Digests are compared by exact byte equality. `Display` renders lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// The all-zero digest.
    pub const ZERO: Self = Self([0_u8; DIGEST_SIZE]);

    /// Create a digest from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Borrow the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Get the underlying bytes.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; DIGEST_SIZE] {
        self.0
    }

    /// Lowercase hex encoding of the digest.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_SIZE] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Errors returned when parsing a hex-encoded digest.
#[derive(Error, Debug, PartialEq)]
pub enum DigestParseError {
    /// The input is not valid hex.
    #[error("Invalid hex digest: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

impl FromStr for Digest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0_u8; DIGEST_SIZE];
        hex::decode_to_slice(s.trim(), &mut bytes)?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing, reason = "Tests")]

    use super::*;

    #[test]
    fn hex_display_and_parse_agree() {
        let mut bytes = [0_u8; DIGEST_SIZE];
        bytes[0] = 0xab;
        bytes[31] = 0x01;
        let digest = Digest::new(bytes);

        let rendered = digest.to_string();
        assert_eq!(rendered.len(), 64);
        assert!(rendered.starts_with("ab"));
        assert!(rendered.ends_with("01"));
        assert_eq!(rendered.parse::<Digest>(), Ok(digest));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!("abcd".parse::<Digest>().is_err());
        assert!("zz".repeat(32).parse::<Digest>().is_err());
    }

    #[test]
    fn zero_is_default() {
        assert_eq!(Digest::default(), Digest::ZERO);
        assert_eq!(<[u8; DIGEST_SIZE]>::from(Digest::ZERO), [0_u8; DIGEST_SIZE]);
    }
}
