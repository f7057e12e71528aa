//! # DevLogs Core
//!
//! Core library for DevLogs - password-protected, encrypted developer journals
//! kept as one file per account.
//!
//! This crate holds the data model, binary formats, encryption and session
//! logic, independent of the CLI.
//!
//! ## Architecture
//!
//! - **codec**: Big-endian integer and length-prefix helpers
//! - **crypto**: Key derivation and the AES-256-CBC envelope
//! - **storage**: Entries, accounts and the account directory
//! - **session**: Single active session with failed-login lockout
//!
//! ## File format
//!
//! ```text
//! salt (32) || IV (16) || AES-256-CBC(account body, PKCS#7)
//! ```

pub mod codec;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod session;
pub mod storage;

pub use error::{DevlogsError, Result};
pub use session::{LockoutPolicy, Session, SessionManager};
pub use storage::{Account, AccountStore, Entry};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
