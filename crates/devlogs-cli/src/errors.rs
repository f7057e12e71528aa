//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use devlogs_core::DevlogsError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (account, entry)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong password, too many attempts)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Account file could not be parsed
    Integrity(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) | CliError::Integrity(message) => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and optional hint.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::Integrity(_) => exit_codes::INTEGRITY_FAILED,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }

    /// Map a core error to its user-facing form.
    ///
    /// Returns `None` for storage and internal errors, which exit with the
    /// generic code.
    pub fn from_core(err: &DevlogsError) -> Option<Self> {
        let mapped = match err {
            DevlogsError::InvalidCredentials => CliError::auth_failed("Incorrect password."),
            DevlogsError::TooManyAttempts { .. } => CliError::auth_failed_with_hint(
                err.to_string(),
                "Hint: Lockouts grow longer with each failed attempt.",
            ),
            DevlogsError::AccountNotFound(name) => CliError::not_found(
                format!("No account named '{}'.", name),
                "Hint: Run `devlogs signup <USERNAME>` to create one.",
            ),
            DevlogsError::EntryNotFound(position) => CliError::not_found(
                format!("No entry at position {}.", position),
                "Hint: Run `devlogs list <USERNAME>` to see positions.",
            ),
            DevlogsError::InvalidAccountFormat(_) => CliError::Integrity(err.to_string()),
            DevlogsError::AccountExists(_)
            | DevlogsError::InvalidUsername(_)
            | DevlogsError::InvalidEntry(_) => CliError::invalid_input(err.to_string()),
            _ => return None,
        };
        Some(mapped)
    }
}
