//! Application-level utilities for the DevLogs CLI.
//!
//! This module provides:
//! - The per-invocation context (config, accounts dir, session manager)
//! - Password handling with retry logic

mod context;
mod login;

// Re-export public API
pub use context::AppContext;
