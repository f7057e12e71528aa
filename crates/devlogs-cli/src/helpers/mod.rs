//! Input helper functions for the CLI.
//!
//! Password prompting, confirmations and entry body reading (`input`).

mod input;

// Re-export public API
pub use input::{
    confirm, is_interactive, password_from_env, prompt_new_password, prompt_password,
    read_entry_body,
};
