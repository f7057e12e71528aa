//! Error types for DevLogs core operations.
//!
//! Every failure in the core is recoverable and reported to the caller.
//! The CLI layer maps these to user-facing messages and exit codes.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for DevLogs operations.
pub type Result<T> = std::result::Result<T, DevlogsError>;

/// Core error type for DevLogs operations.
#[derive(Debug, Error)]
pub enum DevlogsError {
    /// Password did not unlock the account file
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Decrypted account data does not follow the account layout
    #[error("Invalid account format: {0}")]
    InvalidAccountFormat(String),

    /// An account file already exists for this username
    #[error("Account already exists: {0}")]
    AccountExists(String),

    /// No account file exists for this username
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Username violates the length constraint
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Login is locked out after repeated failures
    #[error("Too many failed attempts; retry in {}s", ceil_secs(.retry_after))]
    TooManyAttempts { retry_after: Duration },

    /// A session is already active
    #[error("A session is already ongoing")]
    SessionOngoing,

    /// No session is active
    #[error("No active session")]
    NoSession,

    /// Entry content violates a serialization bound
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    /// Entry index out of range
    #[error("Entry not found at position {0}")]
    EntryNotFound(usize),

    /// Malformed ciphertext or RNG failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Decrypted data carried invalid block padding
    #[error("Invalid padding in decrypted data")]
    BadPadding,

    /// Filesystem error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DevlogsError {
    /// Whether this error counts as a failed authentication attempt.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            DevlogsError::InvalidCredentials | DevlogsError::InvalidAccountFormat(_)
        )
    }
}

/// Whole seconds, rounded up, never below one.
fn ceil_secs(duration: &Duration) -> u64 {
    (duration.as_secs() + u64::from(duration.subsec_nanos() > 0)).max(1)
}

impl From<std::io::Error> for DevlogsError {
    fn from(err: std::io::Error) -> Self {
        DevlogsError::Storage(err.to_string())
    }
}
