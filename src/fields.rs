//! Field selection and record traversal.
//!
//! A record is a JSON object. Only the fields named in a [`FieldList`] are
//! touched; every other key and value is copied through untouched.
//!
//! Type preservation:
//! - string → envelope text (string)
//! - array of strings → array of envelope texts, one fresh nonce per element
//!
//! Anything else in a selected field is a `TypeMismatch`. Names that are not
//! present in the record are skipped.
//!
//! Every operation works on a copy of its input and only hands the copy back
//! once all selected fields succeeded, so a failure never exposes a partially
//! transformed record.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::crypto;
use crate::envelope;
use crate::error::{DecryptCause, PolyCryptError};
use crate::keys::FieldKey;

// ---------------------------------------------------------------------------
// Field list
// ---------------------------------------------------------------------------

/// An ordered list of field names with duplicates removed.
///
/// The first occurrence of each name decides its position. Deduplication
/// keeps a second pass from sealing an already sealed value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct FieldList {
    names: Vec<String>,
}

impl FieldList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        for name in names {
            let name = name.into();
            if !list.names.contains(&name) {
                list.names.push(name);
            }
        }
        list
    }

    /// Parse a field list from JSON text. Anything other than an array of
    /// strings is `MalformedInput`.
    pub fn from_json(text: &str) -> Result<Self, PolyCryptError> {
        serde_json::from_str(text)
            .map_err(|e| PolyCryptError::malformed_json("field list must be an array of strings", &e))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl From<Vec<String>> for FieldList {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl<'a> FromIterator<&'a str> for FieldList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Encrypt the selected fields of one record.
///
/// The key is validated before anything else; a key that is not 32 bytes
/// fails with `InvalidKey` and no cryptographic work is done.
pub fn encrypt_fields(key: &[u8], record: &Value, fields: &FieldList) -> Result<Value, PolyCryptError> {
    let key = FieldKey::from_slice(key)?;
    encrypt_record(&key, record, fields)
}

/// Decrypt the selected fields of one record.
pub fn decrypt_fields(key: &[u8], record: &Value, fields: &FieldList) -> Result<Value, PolyCryptError> {
    let key = FieldKey::from_slice(key)?;
    decrypt_record(&key, record, fields)
}

/// Encrypt the selected fields of every record, left to right.
///
/// All or nothing: the first failing record aborts the batch and the error
/// carries that record's index.
pub fn encrypt_batch(
    key: &[u8],
    records: &[Value],
    fields: &FieldList,
) -> Result<Vec<Value>, PolyCryptError> {
    let key = FieldKey::from_slice(key)?;
    encrypt_records(&key, records, fields)
}

/// Decrypt the selected fields of every record, left to right.
pub fn decrypt_batch(
    key: &[u8],
    records: &[Value],
    fields: &FieldList,
) -> Result<Vec<Value>, PolyCryptError> {
    let key = FieldKey::from_slice(key)?;
    decrypt_records(&key, records, fields)
}

// ---------------------------------------------------------------------------
// Key-bound implementations
// ---------------------------------------------------------------------------

pub(crate) fn encrypt_record(
    key: &FieldKey,
    record: &Value,
    fields: &FieldList,
) -> Result<Value, PolyCryptError> {
    debug!(fields = fields.len(), "encrypting record fields");
    transform(record, fields, |name, value| encrypt_value(key, name, value)).map_err(|e| {
        warn!(field = e.field().unwrap_or("-"), error = %e, "field encryption failed");
        e
    })
}

pub(crate) fn decrypt_record(
    key: &FieldKey,
    record: &Value,
    fields: &FieldList,
) -> Result<Value, PolyCryptError> {
    debug!(fields = fields.len(), "decrypting record fields");
    transform(record, fields, |name, value| decrypt_value(key, name, value)).map_err(|e| {
        warn!(field = e.field().unwrap_or("-"), error = %e, "field decryption failed");
        e
    })
}

pub(crate) fn encrypt_records(
    key: &FieldKey,
    records: &[Value],
    fields: &FieldList,
) -> Result<Vec<Value>, PolyCryptError> {
    debug!(records = records.len(), fields = fields.len(), "encrypting batch");
    process_batch(records, |record| encrypt_record(key, record, fields))
}

pub(crate) fn decrypt_records(
    key: &FieldKey,
    records: &[Value],
    fields: &FieldList,
) -> Result<Vec<Value>, PolyCryptError> {
    debug!(records = records.len(), fields = fields.len(), "decrypting batch");
    process_batch(records, |record| decrypt_record(key, record, fields))
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

fn process_batch<F>(records: &[Value], mut op: F) -> Result<Vec<Value>, PolyCryptError>
where
    F: FnMut(&Value) -> Result<Value, PolyCryptError>,
{
    let mut out = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let processed = op(record).map_err(|e| {
            warn!(record = index, "batch aborted");
            e.in_record(index)
        })?;
        out.push(processed);
    }
    Ok(out)
}

/// Copy `record`, replacing each selected field with `op(name, value)`.
fn transform<F>(record: &Value, fields: &FieldList, mut op: F) -> Result<Value, PolyCryptError>
where
    F: FnMut(&str, &Value) -> Result<Value, PolyCryptError>,
{
    let object = as_object(record)?;
    let mut out = object.clone();
    for name in fields.iter() {
        if let Some(value) = object.get(name) {
            let replaced = op(name, value)?;
            out.insert(name.to_owned(), replaced);
        }
    }
    Ok(Value::Object(out))
}

fn as_object(record: &Value) -> Result<&Map<String, Value>, PolyCryptError> {
    record.as_object().ok_or_else(|| {
        PolyCryptError::MalformedInput(format!("record must be a JSON object, found {}", describe(record)))
    })
}

fn encrypt_value(key: &FieldKey, name: &str, value: &Value) -> Result<Value, PolyCryptError> {
    map_text(name, value, |text| {
        let sealed = crypto::seal_with(key.as_bytes(), text.as_bytes())?;
        Ok(envelope::encode(&sealed))
    })
}

fn decrypt_value(key: &FieldKey, name: &str, value: &Value) -> Result<Value, PolyCryptError> {
    map_text(name, value, |text| open_text(key, name, text))
}

fn open_text(key: &FieldKey, name: &str, text: &str) -> Result<String, PolyCryptError> {
    let sealed = envelope::decode(text).map_err(|_| PolyCryptError::DecodeFailure {
        field: Some(name.to_owned()),
    })?;

    let plaintext = crypto::open_with(key.as_bytes(), &sealed).map_err(|e| match e {
        PolyCryptError::AuthFailure => decrypt_failure(name, DecryptCause::Authentication),
        PolyCryptError::InvalidEnvelope(_) => decrypt_failure(name, DecryptCause::Envelope),
        other => other,
    })?;

    String::from_utf8(plaintext).map_err(|_| decrypt_failure(name, DecryptCause::Utf8))
}

fn decrypt_failure(name: &str, cause: DecryptCause) -> PolyCryptError {
    PolyCryptError::DecryptFailure {
        field: name.to_owned(),
        cause,
    }
}

/// Apply `op` to a string, or to every element of an array of strings.
///
/// Array elements are type-checked up front so a mixed array is rejected
/// before any element is sealed or opened.
fn map_text<F>(name: &str, value: &Value, mut op: F) -> Result<Value, PolyCryptError>
where
    F: FnMut(&str) -> Result<String, PolyCryptError>,
{
    match value {
        Value::String(text) => Ok(Value::String(op(text)?)),
        Value::Array(items) => {
            let texts = items
                .iter()
                .map(|item| {
                    item.as_str().ok_or_else(|| PolyCryptError::TypeMismatch {
                        field: name.to_owned(),
                        found: describe_element(item),
                    })
                })
                .collect::<Result<Vec<&str>, _>>()?;

            let mapped = texts
                .into_iter()
                .map(|text| op(text).map(Value::String))
                .collect::<Result<Vec<Value>, _>>()?;
            Ok(Value::Array(mapped))
        }
        other => Err(PolyCryptError::TypeMismatch {
            field: name.to_owned(),
            found: describe(other),
        }),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn describe_element(value: &Value) -> &'static str {
    match value {
        Value::Null => "array containing null",
        Value::Bool(_) => "array containing boolean",
        Value::Number(_) => "array containing number",
        Value::String(_) => "array of strings",
        Value::Array(_) => "nested array",
        Value::Object(_) => "array containing object",
    }
}
