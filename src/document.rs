//! JSON text boundary.
//!
//! These entry points take the record (or batch) and the field list as JSON
//! text and hand back JSON text, for callers that never build a
//! `serde_json::Value` themselves. The key is validated before any parsing.

use serde_json::Value;

use crate::error::PolyCryptError;
use crate::fields::{self, FieldList};
use crate::keys::FieldKey;

/// Parse a single record. Must be a JSON object.
pub fn parse_record(text: &str) -> Result<Value, PolyCryptError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| PolyCryptError::malformed_json("record is not valid JSON", &e))?;
    if !value.is_object() {
        return Err(PolyCryptError::MalformedInput(
            "record must be a JSON object".to_owned(),
        ));
    }
    Ok(value)
}

/// Parse a batch. Must be a JSON array whose elements are all objects.
pub fn parse_batch(text: &str) -> Result<Vec<Value>, PolyCryptError> {
    let records: Vec<Value> = serde_json::from_str(text)
        .map_err(|e| PolyCryptError::malformed_json("batch must be a JSON array", &e))?;
    if let Some(index) = records.iter().position(|r| !r.is_object()) {
        return Err(
            PolyCryptError::MalformedInput("record must be a JSON object".to_owned()).in_record(index),
        );
    }
    Ok(records)
}

fn render<T: serde::Serialize>(value: &T) -> Result<String, PolyCryptError> {
    // Serialising a `Value` only fails on non-string map keys, which a
    // `Value` cannot hold.
    serde_json::to_string(value).map_err(|e| PolyCryptError::malformed_json("output is not serialisable", &e))
}

pub(crate) fn encrypt_fields_json_with(key: &FieldKey, record: &str, fields: &str) -> Result<String, PolyCryptError> {
    let record = parse_record(record)?;
    let fields = FieldList::from_json(fields)?;
    render(&fields::encrypt_record(key, &record, &fields)?)
}

pub(crate) fn decrypt_fields_json_with(key: &FieldKey, record: &str, fields: &str) -> Result<String, PolyCryptError> {
    let record = parse_record(record)?;
    let fields = FieldList::from_json(fields)?;
    render(&fields::decrypt_record(key, &record, &fields)?)
}

pub(crate) fn encrypt_batch_json_with(key: &FieldKey, records: &str, fields: &str) -> Result<String, PolyCryptError> {
    let records = parse_batch(records)?;
    let fields = FieldList::from_json(fields)?;
    render(&fields::encrypt_records(key, &records, &fields)?)
}

pub(crate) fn decrypt_batch_json_with(key: &FieldKey, records: &str, fields: &str) -> Result<String, PolyCryptError> {
    let records = parse_batch(records)?;
    let fields = FieldList::from_json(fields)?;
    render(&fields::decrypt_records(key, &records, &fields)?)
}

/// [`crate::encrypt_fields`] over JSON text.
pub fn encrypt_fields_json(key: &[u8], record: &str, fields: &str) -> Result<String, PolyCryptError> {
    encrypt_fields_json_with(&FieldKey::from_slice(key)?, record, fields)
}

/// [`crate::decrypt_fields`] over JSON text.
pub fn decrypt_fields_json(key: &[u8], record: &str, fields: &str) -> Result<String, PolyCryptError> {
    decrypt_fields_json_with(&FieldKey::from_slice(key)?, record, fields)
}

/// [`crate::encrypt_batch`] over JSON text.
pub fn encrypt_batch_json(key: &[u8], records: &str, fields: &str) -> Result<String, PolyCryptError> {
    encrypt_batch_json_with(&FieldKey::from_slice(key)?, records, fields)
}

/// [`crate::decrypt_batch`] over JSON text.
pub fn decrypt_batch_json(key: &[u8], records: &str, fields: &str) -> Result<String, PolyCryptError> {
    decrypt_batch_json_with(&FieldKey::from_slice(key)?, records, fields)
}
