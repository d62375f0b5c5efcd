//! The AEAD primitive.
//!
//! This module is the only place in the crate that touches `ring::aead`.
//! Every other module seals and opens exclusively through the functions
//! exposed here.
//!
//! Primitive choices:
//! - **Cipher**: AES-256-GCM (authenticated encryption, no associated data)
//! - **Nonce**: 96-bit (12 bytes), generated fresh per seal via `SystemRandom`
//! - **Tag**: 128-bit (16 bytes), appended after the ciphertext
//!
//! # Envelope layout
//! ```text
//! [ nonce (12 bytes) ][ ciphertext (n bytes) ][ GCM tag (16 bytes) ]
//! ```

use ring::aead::{self, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};

use crate::envelope::Envelope;
use crate::error::PolyCryptError;
use crate::keys::key_array;

/// The AEAD algorithm used throughout polycrypt.
const ALGORITHM: &aead::Algorithm = &AES_256_GCM;

/// Size of the nonce in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Size of the authentication tag in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// Size of a key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Bytes an envelope adds on top of its plaintext.
pub const ENVELOPE_OVERHEAD: usize = NONCE_LEN + TAG_LEN;

/// Draw a fresh nonce from the platform CSPRNG.
///
/// No caching, no counters: the `SystemRandom` handle is created per call.
fn generate_nonce() -> Result<[u8; NONCE_LEN], PolyCryptError> {
    let rng = SystemRandom::new();
    let mut buf = [0u8; NONCE_LEN];
    rng.fill(&mut buf).map_err(|_| PolyCryptError::CryptoFailure)?;
    Ok(buf)
}

fn bind_key(key: &[u8; KEY_LEN]) -> Result<LessSafeKey, PolyCryptError> {
    let unbound = UnboundKey::new(ALGORITHM, key).map_err(|_| PolyCryptError::CryptoFailure)?;
    Ok(LessSafeKey::new(unbound))
}

/// Seal `plaintext` under `key`.
///
/// Returns `nonce ‖ ciphertext ‖ tag`, always `plaintext.len() + 28` bytes.
/// Fails with `InvalidKey` before any cryptographic work if `key` is not
/// 32 bytes.
pub fn seal(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, PolyCryptError> {
    seal_with(key_array(key)?, plaintext)
}

/// Open an envelope produced by [`seal`].
///
/// Envelopes shorter than 28 bytes are rejected with `InvalidEnvelope`.
/// A wrong key or any modified byte yields `AuthFailure`; the caller never
/// receives partial plaintext.
pub fn open(key: &[u8], envelope: &[u8]) -> Result<Vec<u8>, PolyCryptError> {
    open_with(key_array(key)?, envelope)
}

pub(crate) fn seal_with(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, PolyCryptError> {
    let key = bind_key(key)?;
    let nonce = generate_nonce()?;

    let mut output = Vec::with_capacity(plaintext.len() + ENVELOPE_OVERHEAD);
    output.extend_from_slice(&nonce);
    output.extend_from_slice(plaintext);

    // Encrypts `output[NONCE_LEN..]` in place and appends the tag.
    let tag = key
        .seal_in_place_separate_tag(
            Nonce::assume_unique_for_key(nonce),
            aead::Aad::empty(),
            &mut output[NONCE_LEN..],
        )
        .map_err(|_| PolyCryptError::CryptoFailure)?;
    output.extend_from_slice(tag.as_ref());

    Ok(output)
}

pub(crate) fn open_with(key: &[u8; KEY_LEN], envelope: &[u8]) -> Result<Vec<u8>, PolyCryptError> {
    let envelope = Envelope::parse(envelope)?;
    let nonce = Nonce::try_assume_unique_for_key(envelope.nonce())
        .map_err(|_| PolyCryptError::InvalidEnvelope(envelope.as_bytes().len()))?;

    let key = bind_key(key)?;
    // `open_in_place` expects ciphertext and tag in one buffer.
    let mut payload = envelope.sealed_payload().to_vec();
    let plaintext = key
        .open_in_place(nonce, aead::Aad::empty(), &mut payload)
        .map_err(|_| PolyCryptError::AuthFailure)?;
    let len = plaintext.len();
    payload.truncate(len);

    Ok(payload)
}

/// Generate 32 bytes of fresh key material from the platform CSPRNG.
pub(crate) fn generate_random_key() -> Result<[u8; KEY_LEN], PolyCryptError> {
    let rng = SystemRandom::new();
    let mut key = [0u8; KEY_LEN];
    rng.fill(&mut key).map_err(|_| PolyCryptError::CryptoFailure)?;
    Ok(key)
}
