//! Envelope text codec.
//!
//! Inside a record an envelope is stored as standard, `=`-padded base64.
//! Decoding is strict: characters outside the alphabet, missing or extra
//! padding, non-canonical trailing bits, and lengths that are not a multiple
//! of four are all rejected.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::crypto::{ENVELOPE_OVERHEAD, NONCE_LEN, TAG_LEN};
use crate::error::PolyCryptError;

/// Encode envelope bytes as base64 text.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64 envelope text back into bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, PolyCryptError> {
    STANDARD
        .decode(text)
        .map_err(|_| PolyCryptError::DecodeFailure { field: None })
}

/// A borrowed, structurally valid view of `nonce ‖ ciphertext ‖ tag`.
///
/// Parsing does not decrypt or authenticate anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    bytes: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Split raw envelope bytes into their parts.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, PolyCryptError> {
        if bytes.len() < ENVELOPE_OVERHEAD {
            return Err(PolyCryptError::InvalidEnvelope(bytes.len()));
        }
        Ok(Self { bytes })
    }

    pub fn nonce(&self) -> &'a [u8] {
        &self.bytes[..NONCE_LEN]
    }

    pub fn ciphertext(&self) -> &'a [u8] {
        &self.bytes[NONCE_LEN..self.bytes.len() - TAG_LEN]
    }

    pub fn tag(&self) -> &'a [u8] {
        &self.bytes[self.bytes.len() - TAG_LEN..]
    }

    /// Ciphertext followed by the tag, as the cipher consumes it.
    pub(crate) fn sealed_payload(&self) -> &'a [u8] {
        &self.bytes[NONCE_LEN..]
    }

    /// Length of the plaintext this envelope decrypts to.
    pub fn plaintext_len(&self) -> usize {
        self.bytes.len() - ENVELOPE_OVERHEAD
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Length of the envelope text produced for a plaintext of `plaintext_len`
/// bytes.
pub fn encoded_len(plaintext_len: usize) -> usize {
    4 * (plaintext_len + ENVELOPE_OVERHEAD).div_ceil(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn encode_uses_standard_padded_alphabet() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(b"f"), "Zg==");
        assert_eq!(encode(b"fo"), "Zm8=");
        assert_eq!(encode(b"foo"), "Zm9v");
        assert_eq!(encode(&[0xfb, 0xff]), "+/8=");
    }

    #[test]
    fn decode_rejects_non_strict_input() {
        for bad in ["Zg", "Zg=", "Zm9v=", "Zm9v\n", "Zm-v", "Zm_v", "Zh==", "!!!!", "Z==="] {
            let err = decode(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DecodeFailure, "accepted {bad:?}");
        }
    }

    #[test]
    fn decode_accepts_canonical_text() {
        assert_eq!(decode("Zm9vYg==").unwrap(), b"foob");
        assert_eq!(decode("").unwrap(), b"");
    }

    #[test]
    fn envelope_parts_cover_the_whole_buffer() {
        let bytes: Vec<u8> = (0u8..40).collect();
        let env = Envelope::parse(&bytes).unwrap();
        assert_eq!(env.nonce(), &bytes[..12]);
        assert_eq!(env.ciphertext(), &bytes[12..24]);
        assert_eq!(env.tag(), &bytes[24..]);
        assert_eq!(env.plaintext_len(), 12);
        assert_eq!(env.as_bytes(), &bytes[..]);
        assert_eq!(env.sealed_payload(), &bytes[12..]);
    }

    #[test]
    fn envelope_parse_rejects_short_input() {
        let err = Envelope::parse(&[0u8; 27]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnvelope);
        assert!(Envelope::parse(&[0u8; 28]).unwrap().ciphertext().is_empty());
    }

    #[test]
    fn encoded_len_matches_known_sizes() {
        assert_eq!(encoded_len(0), 40);
        assert_eq!(encoded_len(1), 40);
        assert_eq!(encoded_len(13), 56);
    }
}
