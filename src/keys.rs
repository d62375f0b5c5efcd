//! Key ownership.
//!
//! polycrypt never derives, stores, or rotates keys. Callers hand in 32 raw
//! bytes on every call, or bind them once into a [`crate::PolyCrypt`] handle.
//! Either way the bytes end up in a [`FieldKey`]:
//!
//! - Not `Clone`. Cannot be duplicated without explicit conversion.
//! - Zeroised on drop. Memory is overwritten before deallocation.
//! - `Debug` never prints the bytes.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::KEY_LEN;
use crate::error::PolyCryptError;

/// A 256-bit AES-GCM key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct FieldKey {
    bytes: [u8; KEY_LEN],
}

impl FieldKey {
    /// Construct a key from exactly 32 bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Construct a key from a slice, rejecting anything that is not 32 bytes
    /// long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PolyCryptError> {
        Ok(Self {
            bytes: *key_array(bytes)?,
        })
    }

    /// Borrow the raw key bytes for a seal or open.
    ///
    /// `pub(crate)`: raw bytes never leave the crate.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// View raw key bytes as a 32-byte array, or fail with `InvalidKey`.
///
/// Every entry point that takes a key as a slice goes through here.
pub(crate) fn key_array(bytes: &[u8]) -> Result<&[u8; KEY_LEN], PolyCryptError> {
    bytes
        .try_into()
        .map_err(|_| PolyCryptError::InvalidKey(bytes.len()))
}

impl std::fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FieldKey(<redacted>)")
    }
}
