//! Input handling helpers for password and entry body reading.

use std::io::{self, IsTerminal, Read};

use dialoguer::{Confirm, Editor, Password};
use secrecy::{ExposeSecret, SecretString};

use crate::constants::PASSWORD_ENV;
use crate::errors::CliError;

/// Whether prompts can be shown.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Password from `DEVLOGS_PASSWORD`, if set. An empty value is a password
/// like any other, as it is at the prompt.
pub fn password_from_env() -> Option<SecretString> {
    std::env::var(PASSWORD_ENV).ok().map(SecretString::from)
}

/// Prompt for an account password.
pub fn prompt_password(username: &str) -> anyhow::Result<SecretString> {
    Password::new()
        .with_prompt(format!("Password for {}", username))
        .allow_empty_password(true)
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Password for a new account, from the env var or a confirmed prompt.
/// Both paths refuse an empty password.
pub fn prompt_new_password() -> anyhow::Result<SecretString> {
    if let Some(password) = password_from_env() {
        if password.expose_secret().is_empty() {
            return Err(CliError::invalid_input(format!("{} is empty.", PASSWORD_ENV)).into());
        }
        return Ok(password);
    }
    if !is_interactive() {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            PASSWORD_ENV
        ));
    }
    Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Ask a yes/no question, defaulting to no.
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}

/// Read entry body from --body, stdin, or $EDITOR.
///
/// An empty body is allowed.
pub fn read_entry_body(body: Option<String>, initial: &str) -> anyhow::Result<String> {
    if let Some(value) = body {
        return Ok(value);
    }

    if !is_interactive() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(buffer.trim_end_matches(['\r', '\n']).to_string());
    }

    let edited = Editor::new()
        .require_save(true)
        .edit(initial)
        .map_err(|e| anyhow::anyhow!("Failed to launch editor: {}", e))?;
    edited
        .map(|text| text.trim_end_matches(['\r', '\n']).to_string())
        .ok_or_else(|| anyhow::anyhow!("Editor closed without saving; entry not written"))
}
