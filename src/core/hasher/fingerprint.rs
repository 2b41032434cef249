//! The fingerprint value used as a gallery file name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bytes in a fingerprint (64 bits)
pub const FINGERPRINT_BYTES: usize = 8;

/// A 64-bit perceptual fingerprint.
///
/// Rendered as 16 lowercase hex characters, which is also the stem of
/// the file name it gets in the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    bytes: [u8; FINGERPRINT_BYTES],
}

impl Fingerprint {
    /// Create a fingerprint from raw hash bytes
    pub fn new(bytes: [u8; FINGERPRINT_BYTES]) -> Self {
        Self { bytes }
    }

    /// Create from a slice, returning `None` unless it is exactly 8 bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; FINGERPRINT_BYTES] = bytes.try_into().ok()?;
        Some(Self::new(bytes))
    }

    /// Get the hash as a lowercase hexadecimal string
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// Gallery file name for this fingerprint and a dotted extension
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}{}", self.to_hex(), extension)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.bytes {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
