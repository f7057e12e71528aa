//! Password-to-key derivation.
//!
//! An account key is `SHA-256(PEPPER || password || salt)`. The same digest
//! is the AES-256 key for the account body and the value embedded in it, so
//! a successful unlock is what proves the password.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{DevlogsError, Result};

/// Application-wide pepper mixed into every key derivation.
///
/// Compiled in for compatibility with existing account files; anyone holding
/// the binary can read it.
const PEPPER: [u8; 32] = [
    0x8e, 0xa5, 0x48, 0x0d, 0x60, 0x1d, 0x44, 0xda, 0x6d, 0xa0, 0xb2, 0x5b, 0x3f, 0x8e, 0xb0, 0xfe,
    0xb6, 0xa6, 0xa5, 0x4a, 0xb6, 0x6c, 0xc1, 0x50, 0x29, 0xdb, 0xda, 0x04, 0x7c, 0x3d, 0x52, 0x42,
];

/// Length of salts and derived keys in bytes.
pub const KEY_LENGTH: usize = 32;

/// Per-account random salt, stored in plaintext ahead of the ciphertext.
#[derive(Clone, PartialEq, Eq)]
pub struct Salt([u8; KEY_LENGTH]);

impl Salt {
    /// Fresh salt from the OS RNG.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; KEY_LENGTH];
        getrandom::getrandom(&mut bytes)
            .map_err(|e| DevlogsError::Crypto(format!("Failed to generate salt: {}", e)))?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Salt").field(&"[32 bytes]").finish()
    }
}

/// A 256-bit key derived from a password.
///
/// Zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Raw key bytes. Do not store or log.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Compare against raw key bytes without short-circuiting.
    pub fn matches(&self, other: &[u8]) -> bool {
        if other.len() != KEY_LENGTH {
            return false;
        }
        let diff = self
            .key
            .iter()
            .zip(other)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        diff == 0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive the account key for `password` under `salt`.
///
/// Deterministic: the same password and salt always produce the same key.
/// Any password is accepted, including the empty one.
pub fn derive_key(password: &str, salt: &Salt) -> DerivedKey {
    let mut hasher = Sha256::new();
    hasher.update(PEPPER);
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    let mut digest: [u8; KEY_LENGTH] = hasher.finalize().into();
    let key = DerivedKey::from_bytes(digest);
    digest.zeroize();
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_answer() {
        let key = derive_key("hunter2", &Salt::from_bytes([0u8; KEY_LENGTH]));
        assert_eq!(
            hex::encode(key.as_bytes()),
            "d7724337f3b1ee63522056961d47f593738a3c88b6b3448d6aa31c581fd9447d"
        );
    }

    #[test]
    fn test_key_derivation_deterministic() {
        let salt = Salt::from_bytes([7u8; KEY_LENGTH]);
        let key1 = derive_key("hunter2", &salt);
        let key2 = derive_key("hunter2", &salt);
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("hunter2", &Salt::from_bytes([1u8; KEY_LENGTH]));
        let key2 = derive_key("hunter2", &Salt::from_bytes([2u8; KEY_LENGTH]));
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let salt = Salt::from_bytes([3u8; KEY_LENGTH]);
        assert_ne!(
            derive_key("hunter2", &salt).as_bytes(),
            derive_key("hunter3", &salt).as_bytes()
        );
    }

    #[test]
    fn test_generated_salts_differ() {
        let a = Salt::generate().unwrap();
        let b = Salt::generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_matches() {
        let key = derive_key("pw", &Salt::from_bytes([0u8; KEY_LENGTH]));
        let copy = *key.as_bytes();
        assert!(key.matches(&copy));

        let mut flipped = copy;
        flipped[31] ^= 0x01;
        assert!(!key.matches(&flipped));
        assert!(!key.matches(&copy[..16]));
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let key = derive_key("pw", &Salt::from_bytes([9u8; KEY_LENGTH]));
        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
