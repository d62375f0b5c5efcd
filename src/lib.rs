//! # polycrypt
//!
//! Field-level encryption for JSON records.
//!
//! Selected fields of a record are replaced by self-contained AES-256-GCM
//! envelopes (`nonce ‖ ciphertext ‖ tag`, base64 encoded). Every other field
//! passes through untouched. Strings stay strings and arrays of strings stay
//! arrays of strings, each element sealed under its own nonce.
//!
//! ## Public API
//!
//! - Byte level: [`seal`], [`open`]
//! - Record level: [`encrypt_fields`], [`decrypt_fields`], [`encrypt_batch`],
//!   [`decrypt_batch`], plus `_json` variants taking and returning JSON text
//! - A [`PolyCrypt`] handle that binds a key once
//! - [`logger::init`] to turn on diagnostics
//!
//! Key management is the caller's job. polycrypt never stores, derives, or
//! rotates keys, and the envelope is not bound to the field or record it
//! sits in.

pub(crate) mod crypto;
pub mod document;
pub mod envelope;
pub mod error;
pub mod fields;
pub(crate) mod keys;
pub mod logger;

pub use crypto::{open, seal, ENVELOPE_OVERHEAD, KEY_LEN, NONCE_LEN, TAG_LEN};
pub use document::{decrypt_batch_json, decrypt_fields_json, encrypt_batch_json, encrypt_fields_json};
pub use envelope::Envelope;
pub use error::{DecryptCause, ErrorKind, PolyCryptError, Result};
pub use fields::{decrypt_batch, decrypt_fields, encrypt_batch, encrypt_fields, FieldList};
pub use keys::FieldKey;

use serde_json::Value;

/// Generate a fresh 256-bit key from the platform CSPRNG.
///
/// In production, callers should source keys from a dedicated KMS rather
/// than generating them locally.
pub fn generate_key() -> Result<FieldKey> {
    let bytes = crypto::generate_random_key()?;
    Ok(FieldKey::from_bytes(bytes))
}

/// A key bound once for repeated field operations.
///
/// Every method behaves exactly like the free function of the same name
/// called with this key. The handle holds no mutable state and can be
/// shared across threads.
#[derive(Debug)]
pub struct PolyCrypt {
    key: FieldKey,
}

impl PolyCrypt {
    pub fn new(key: FieldKey) -> Self {
        Self { key }
    }

    /// Bind a key given as raw bytes; anything but 32 bytes is `InvalidKey`.
    pub fn from_key_bytes(key: &[u8]) -> Result<Self> {
        Ok(Self::new(FieldKey::from_slice(key)?))
    }

    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        crypto::seal_with(self.key.as_bytes(), plaintext)
    }

    pub fn open(&self, envelope: &[u8]) -> Result<Vec<u8>> {
        crypto::open_with(self.key.as_bytes(), envelope)
    }

    pub fn encrypt_fields(&self, record: &Value, fields: &FieldList) -> Result<Value> {
        fields::encrypt_record(&self.key, record, fields)
    }

    pub fn decrypt_fields(&self, record: &Value, fields: &FieldList) -> Result<Value> {
        fields::decrypt_record(&self.key, record, fields)
    }

    pub fn encrypt_batch(&self, records: &[Value], fields: &FieldList) -> Result<Vec<Value>> {
        fields::encrypt_records(&self.key, records, fields)
    }

    pub fn decrypt_batch(&self, records: &[Value], fields: &FieldList) -> Result<Vec<Value>> {
        fields::decrypt_records(&self.key, records, fields)
    }

    pub fn encrypt_fields_json(&self, record: &str, fields: &str) -> Result<String> {
        document::encrypt_fields_json_with(&self.key, record, fields)
    }

    pub fn decrypt_fields_json(&self, record: &str, fields: &str) -> Result<String> {
        document::decrypt_fields_json_with(&self.key, record, fields)
    }

    pub fn encrypt_batch_json(&self, records: &str, fields: &str) -> Result<String> {
        document::encrypt_batch_json_with(&self.key, records, fields)
    }

    pub fn decrypt_batch_json(&self, records: &str, fields: &str) -> Result<String> {
        document::decrypt_batch_json_with(&self.key, records, fields)
    }
}
