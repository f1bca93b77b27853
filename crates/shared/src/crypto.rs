//! Cryptographic utilities for join codes and edit tokens.

use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

/// Alphabet for human-shareable codes. Avoids the confusable 0, O, I and 1.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of random bytes behind an edit token.
const EDIT_TOKEN_BYTES: usize = 32;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a random code of `len` characters drawn from [`CODE_ALPHABET`].
pub fn random_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Generates a new opaque edit token (64 hex characters).
///
/// Only the [`sha256_hex`] digest of the token is ever persisted.
pub fn generate_edit_token() -> String {
    let mut bytes = [0u8; EDIT_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
