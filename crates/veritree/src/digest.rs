//! 32-byte SHA256 digest with hex parsing and formatting

use std::fmt;
use std::str::FromStr;

use crate::error::TreeError;
use crate::DIGEST_LEN;

/// A 32-byte SHA256 digest.
///
/// Displayed and parsed as 64 lowercase hex characters, no prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Parse a digest from 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, DigestParseError> {
        let bytes = hex::decode(s).map_err(|_| DigestParseError::InvalidHex)?;
        let raw: [u8; DIGEST_LEN] = bytes
            .try_into()
            .map_err(|_| DigestParseError::InvalidLength)?;
        Ok(Digest(raw))
    }

    /// Hex representation, lowercase.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Copy the digest into `out`, which must hold at least
    /// [`DIGEST_LEN`] bytes.
    pub fn copy_to(&self, out: &mut [u8]) -> Result<(), TreeError> {
        if out.len() < DIGEST_LEN {
            return Err(TreeError::InvalidArgs);
        }
        out[..DIGEST_LEN].copy_from_slice(&self.0);
        Ok(())
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(raw: [u8; DIGEST_LEN]) -> Self {
        Digest(raw)
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

impl FromStr for Digest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Digest::from_hex(s)
    }
}

/// Error parsing a digest from hex
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DigestParseError {
    #[error("invalid hex in digest")]
    InvalidHex,
    #[error("digest must be 64 hex characters")]
    InvalidLength,
}
