//! Shared helpers for integration tests.

#![allow(dead_code)]

use ring::rand::{SecureRandom, SystemRandom};

/// Fill a buffer of `len` random bytes.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let rng = SystemRandom::new();
    let mut buf = vec![0u8; len];
    rng.fill(&mut buf).unwrap();
    buf
}

pub fn random_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    key.copy_from_slice(&random_bytes(32));
    key
}

/// A random length in `0..max`.
pub fn random_len(max: usize) -> usize {
    let raw = random_bytes(4);
    u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize % max
}

/// A random printable ASCII string, occasionally with multi-byte characters.
pub fn random_text(max_len: usize) -> String {
    let len = random_len(max_len + 1);
    random_bytes(len)
        .into_iter()
        .map(|b| match b % 40 {
            0 => 'é',
            1 => '✓',
            _ => char::from(b' ' + (b % 95)),
        })
        .collect()
}
