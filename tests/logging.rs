//! Diagnostics must never carry key bytes, plaintext, or nonces.

use std::io;
use std::sync::{Arc, Mutex};

use polycrypt::{
    decrypt_batch, decrypt_fields, encrypt_batch, encrypt_batch_json, encrypt_fields, envelope,
    FieldList,
};
use serde_json::{json, Value};
use tracing::Level;

/// A writer that appends every formatted event to a shared buffer.
#[derive(Clone)]
struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a trace-level subscriber and return everything it logged.
fn capture<F: FnOnce()>(f: F) -> String {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let writer = CaptureWriter {
        buf: Arc::clone(&buf),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buf.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

const KEY: [u8; 32] = [0xA5; 32];
const SECRETS: [&str; 4] = ["078-05-1120", "alice@example.com", "+1-555-0100", "hunter2"];

fn customer() -> Value {
    json!({
        "id": "cust-1",
        "ssn": "078-05-1120",
        "email": "alice@example.com",
        "phones": ["+1-555-0100"],
        "pin": ["hunter2", 7]
    })
}

#[test]
fn test_logs_carry_no_secrets() {
    let mut nonce_prefixes = Vec::new();

    let logs = capture(|| {
        let fields = FieldList::new(["ssn", "email", "phones"]);

        // 1. Successful single-record and batch round trips.
        let sealed = encrypt_fields(&KEY, &customer(), &fields).unwrap();
        decrypt_fields(&KEY, &sealed, &fields).unwrap();
        let batch = encrypt_batch(&KEY, &[customer(), customer()], &fields).unwrap();
        decrypt_batch(&KEY, &batch, &fields).unwrap();

        // The first 16 envelope-text characters encode the nonce.
        for name in ["ssn", "email"] {
            let text = sealed[name].as_str().unwrap();
            nonce_prefixes.push(text[..16].to_owned());
        }

        // 2. Failures: mixed array, tampered envelope, wrong key, bad base64,
        // malformed batch text.
        let err = encrypt_fields(&KEY, &customer(), &FieldList::new(["pin"]));
        assert!(err.is_err());

        let mut bytes = envelope::decode(sealed["ssn"].as_str().unwrap()).unwrap();
        bytes[14] ^= 0x01;
        let mut tampered = sealed.clone();
        tampered["ssn"] = Value::String(envelope::encode(&bytes));
        assert!(decrypt_fields(&KEY, &tampered, &fields).is_err());

        assert!(decrypt_batch(&[0x5A; 32], &batch, &fields).is_err());

        let garbage = json!({"ssn": "078-05-1120"});
        assert!(decrypt_fields(&KEY, &garbage, &FieldList::new(["ssn"])).is_err());

        assert!(encrypt_batch_json(&KEY, r#""alice@example.com""#, r#"["email"]"#).is_err());
    });

    // 3. Logging actually happened, at debug and warn.
    assert!(logs.contains("encrypting record fields"), "{logs}");
    assert!(logs.contains("field decryption failed"), "{logs}");
    assert!(logs.contains("batch aborted"), "{logs}");

    // 4. Nothing sensitive reached the output.
    for secret in SECRETS {
        assert!(!logs.contains(secret), "plaintext {secret:?} was logged");
    }
    assert!(!logs.contains("165, 165"), "key bytes were logged");
    assert!(!logs.contains("a5a5"), "key bytes were logged");
    for prefix in nonce_prefixes {
        assert!(!logs.contains(&prefix), "nonce was logged");
    }
}
