//! Application context for the DevLogs CLI.
//!
//! Bundles CLI arguments with the resolved config and the session manager
//! every command runs through.

use devlogs_core::{AccountStore, SessionManager};
use tracing::debug;

use super::login::login;
use crate::cli::Cli;
use crate::config::load_config;

/// Application context shared by command handlers.
pub struct AppContext<'a> {
    cli: &'a Cli,
    manager: SessionManager,
}

impl<'a> AppContext<'a> {
    /// Resolve config and accounts directory for this invocation.
    pub fn new(cli: &'a Cli) -> anyhow::Result<Self> {
        let config = load_config(cli.config.as_deref())?;
        let dir = config.accounts_dir(cli.accounts_dir.as_deref())?;
        let policy = config.lockout_policy()?;
        debug!(dir = %dir.display(), ?policy, "resolved accounts directory");

        Ok(Self {
            cli,
            manager: SessionManager::with_policy(AccountStore::new(dir), policy),
        })
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn store(&self) -> &AccountStore {
        self.manager.store()
    }

    /// Log in as `username`, run `f`, then end the session.
    ///
    /// The account is written back only when `persist` is set and `f`
    /// succeeded; otherwise the session is discarded.
    pub fn with_session<T>(
        &self,
        username: &str,
        persist: bool,
        f: impl FnOnce(&SessionManager) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        login(&self.manager, username)?;
        let result = f(&self.manager);
        if persist && result.is_ok() {
            self.manager.logout()?;
        } else {
            self.manager.discard()?;
        }
        result
    }
}
