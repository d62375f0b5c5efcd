//! Minimal example: protecting PII fields of a customer record.
//!
//! Run with: `RUST_LOG=debug cargo run --example customer_record`
//!
//! - Only the selected fields are encrypted; the rest stay readable
//! - Arrays of strings are encrypted element by element
//! - A tampered envelope is rejected and named in the error

use polycrypt::{envelope, generate_key, logger, FieldList, PolyCrypt};
use serde_json::{json, Value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_from_env();

    // 1. Setup
    let crypt = PolyCrypt::new(generate_key()?);
    let fields = FieldList::new(["email", "phones", "ssn"]);

    let customer = json!({
        "id": "cust-0042",
        "name": "Alice",
        "email": "alice@example.com",
        "phones": ["+1-555-0100", "+1-555-0199"],
        "ssn": "078-05-1120",
        "loyalty_points": 1200
    });

    // 2. Encrypt
    let protected = crypt.encrypt_fields(&customer, &fields)?;
    println!("Protected record:\n{}", serde_json::to_string_pretty(&protected)?);

    // 3. Decrypt
    let restored = crypt.decrypt_fields(&protected, &fields)?;
    assert_eq!(restored, customer);
    println!("Round trip OK");

    // 4. Tamper with the SSN envelope
    let mut bytes = envelope::decode(protected["ssn"].as_str().unwrap_or_default())?;
    bytes[0] ^= 0x01;
    let mut tampered = protected.clone();
    tampered["ssn"] = Value::String(envelope::encode(&bytes));

    match crypt.decrypt_fields(&tampered, &fields) {
        Ok(_) => println!("Tampering went unnoticed (this should not happen)"),
        Err(e) => println!("Tampering rejected: {e}"),
    }

    Ok(())
}
