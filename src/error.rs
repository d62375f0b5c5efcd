//! Error types for polycrypt.
//!
//! Every variant is a distinct failure mode of the field encryption engine.
//! Messages say *what* failed and, where useful, *which field* or *which
//! record*. They never carry key bytes, plaintext, or nonce values.

use thiserror::Error;

/// The closed set of failure kinds, independent of any context attached to
/// a particular error value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidKey,
    CryptoFailure,
    InvalidEnvelope,
    AuthFailure,
    DecodeFailure,
    MalformedInput,
    TypeMismatch,
    DecryptFailure,
}

/// Why a selected field could not be decrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptCause {
    /// The GCM tag did not verify: wrong key or tampered envelope.
    Authentication,
    /// The envelope is too short to hold a nonce and a tag.
    Envelope,
    /// The tag verified but the recovered bytes are not UTF-8 text.
    Utf8,
}

impl std::fmt::Display for DecryptCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication failed"),
            Self::Envelope => write!(f, "invalid envelope"),
            Self::Utf8 => write!(f, "plaintext is not utf-8"),
        }
    }
}

/// The single error type for all polycrypt operations.
#[derive(Debug, Error)]
pub enum PolyCryptError {
    /// The key is not exactly 32 bytes.
    #[error("invalid key: expected 32 bytes, got {0}")]
    InvalidKey(usize),

    /// The system random source or the cipher itself failed.
    #[error("cryptographic operation failed")]
    CryptoFailure,

    /// The envelope is too short or structurally impossible.
    #[error("invalid envelope: {0} bytes is below the 28 byte minimum")]
    InvalidEnvelope(usize),

    /// The authentication tag did not verify.
    #[error("authentication failed")]
    AuthFailure,

    /// Envelope text is not strict, padded, standard base64.
    #[error("base64 decode failed{}", field_suffix(.field))]
    DecodeFailure { field: Option<String> },

    /// A record, batch, or field list has the wrong shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A selected field holds a value that cannot be encrypted or decrypted.
    #[error("type mismatch in field `{field}`: expected string or array of strings, found {found}")]
    TypeMismatch { field: String, found: &'static str },

    /// A selected field failed to decrypt.
    #[error("decryption of field `{field}` failed: {cause}")]
    DecryptFailure { field: String, cause: DecryptCause },

    /// A failure inside one record of a batch.
    #[error("record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: Box<PolyCryptError>,
    },
}

fn field_suffix(field: &Option<String>) -> String {
    match field {
        Some(name) => format!(" in field `{name}`"),
        None => String::new(),
    }
}

impl PolyCryptError {
    /// The kind of failure, looking through any batch wrapper.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidKey(_) => ErrorKind::InvalidKey,
            Self::CryptoFailure => ErrorKind::CryptoFailure,
            Self::InvalidEnvelope(_) => ErrorKind::InvalidEnvelope,
            Self::AuthFailure => ErrorKind::AuthFailure,
            Self::DecodeFailure { .. } => ErrorKind::DecodeFailure,
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::DecryptFailure { .. } => ErrorKind::DecryptFailure,
            Self::Record { source, .. } => source.kind(),
        }
    }

    /// The field the failure is attributed to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::DecodeFailure { field } => field.as_deref(),
            Self::TypeMismatch { field, .. } | Self::DecryptFailure { field, .. } => Some(field),
            Self::Record { source, .. } => source.field(),
            _ => None,
        }
    }

    /// The index of the failing record for batch operations.
    pub fn record_index(&self) -> Option<usize> {
        match self {
            Self::Record { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// A `MalformedInput` for JSON that failed to parse or had the wrong
    /// shape. Only the error category and position are kept: serde_json
    /// messages quote the offending input, which may be plaintext.
    pub(crate) fn malformed_json(context: &str, err: &serde_json::Error) -> Self {
        let category = match err.classify() {
            serde_json::error::Category::Io => "io error",
            serde_json::error::Category::Syntax => "syntax error",
            serde_json::error::Category::Data => "unexpected type",
            serde_json::error::Category::Eof => "unexpected end of input",
        };
        Self::MalformedInput(format!(
            "{context} ({category} at line {}, column {})",
            err.line(),
            err.column()
        ))
    }

    pub(crate) fn in_record(self, index: usize) -> Self {
        Self::Record {
            index,
            source: Box::new(self),
        }
    }
}

/// Shorthand for results produced by this crate.
pub type Result<T> = std::result::Result<T, PolyCryptError>;
