//! Cryptographic operations for DevLogs.
//!
//! - **Key derivation**: SHA-256 over a compiled-in pepper, the password and
//!   a per-account salt
//! - **Envelope**: AES-256-CBC with a random IV and PKCS#7 padding
//!
//! ## Threat Model
//!
//! We defend against:
//! - Reading entries from a stolen account file without the password
//!
//! We do NOT defend against:
//! - Ciphertext tampering (there is no MAC)
//! - Fast offline guessing (a single SHA-256 round is cheap)
//! - Compromised OS or access to an unlocked session

pub mod envelope;
pub mod key;

pub use envelope::{EnvelopeKey, BLOCK_SIZE};
pub use key::{derive_key, DerivedKey, Salt, KEY_LENGTH};
