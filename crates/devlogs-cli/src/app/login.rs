use devlogs_core::{DevlogsError, SessionManager};
use secrecy::ExposeSecret;

use crate::constants::PASSWORD_ENV;
use crate::helpers::{is_interactive, password_from_env, prompt_password};

/// Start a session for `username`.
///
/// With `DEVLOGS_PASSWORD` set there is exactly one attempt. On a TTY the
/// prompt repeats until the session manager locks further attempts out.
pub fn login(manager: &SessionManager, username: &str) -> anyhow::Result<()> {
    if !manager.store().exists(username) {
        return Err(DevlogsError::AccountNotFound(username.to_string()).into());
    }

    if let Some(password) = password_from_env() {
        manager.login(username, password.expose_secret())?;
        return Ok(());
    }
    if !is_interactive() {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            PASSWORD_ENV
        ));
    }

    loop {
        let password = prompt_password(username)?;
        match manager.login(username, password.expose_secret()) {
            Ok(()) => return Ok(()),
            Err(err) if err.is_auth_failure() => {
                if let Some(retry_after) = manager.lockout_remaining()? {
                    return Err(DevlogsError::TooManyAttempts { retry_after }.into());
                }
                let failed = manager.failed_attempts()?;
                let remaining = manager.policy().max_attempts.saturating_sub(failed);
                eprintln!(
                    "Incorrect password. {} attempt{} remaining.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
}
