//! Confirmation tokens and registration codes.
//!
//! Tokens are 32 bytes from the OS RNG, hex-encoded for use in links. Only
//! their SHA-256 digest is ever persisted.

use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 32;

/// Unambiguous alphabet (no `0/O`, `1/I`); its length divides 256 so a byte
/// maps onto it without bias.
const CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LEN: usize = 8;
pub const CODE_PREFIX: &str = "RTR-";

/// Generate a fresh token. Returns `(token, digest)`: the token goes into the
/// email, the digest into the store.
pub fn generate_token() -> (String, String) {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  let token = hex::encode(bytes);
  let digest = digest_token(&token);
  (token, digest)
}

pub fn digest_token(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

/// Human-facing reference such as `RTR-K7QH3MZP`.
pub fn generate_registration_code() -> String {
  let mut bytes = [0u8; CODE_LEN];
  OsRng.fill_bytes(&mut bytes);
  let suffix: String = bytes
    .iter()
    .map(|b| CODE_ALPHABET[(*b as usize) % CODE_ALPHABET.len()] as char)
    .collect();
  format!("{CODE_PREFIX}{suffix}")
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn token_is_64_hex_chars() {
    let (token, _) = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn digest_matches_token() {
    let (token, digest) = generate_token();
    assert_eq!(digest_token(&token), digest);
    assert_ne!(token, digest);
  }

  #[test]
  fn tokens_are_unique() {
    let tokens: HashSet<String> = (0..100).map(|_| generate_token().0).collect();
    assert_eq!(tokens.len(), 100);
  }

  #[test]
  fn registration_code_shape() {
    let code = generate_registration_code();
    let suffix = code.strip_prefix(CODE_PREFIX).unwrap();
    assert_eq!(suffix.len(), CODE_LEN);
    assert!(suffix.bytes().all(|b| CODE_ALPHABET.contains(&b)));
  }
}
