//! Login sessions and failed-attempt lockout.
//!
//! A [`SessionManager`] holds at most one active [`Session`]. Failed logins
//! are counted; reaching the policy threshold starts a lockout episode during
//! which every login fails fast without reading any file. Each episode lasts
//! longer than the previous one until a login succeeds.
//!
//! The counter is not cleared when an episode ends, so after the threshold is
//! reached every further failure starts a new episode immediately.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::{DevlogsError, Result};
use crate::storage::entry::now_ns;
use crate::storage::{Account, AccountStore, Entry};

/// Default failed attempts before lockout.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Lockout tuning.
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    /// Failed attempts before a lockout episode starts
    pub max_attempts: u32,
    /// Duration of the first episode
    pub base_delay: Duration,
    /// Added to the duration after every episode
    pub delay_increment: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_secs(20),
            delay_increment: Duration::from_secs(10),
        }
    }
}

/// An unlocked account.
#[derive(Debug)]
pub struct Session {
    account: Account,
    started_at: u64,
}

impl Session {
    fn new(account: Account) -> Self {
        Self {
            account,
            started_at: now_ns(),
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Login time in nanoseconds since the Unix epoch.
    pub fn started_at(&self) -> u64 {
        self.started_at
    }
}

#[derive(Debug)]
struct ManagerState {
    session: Option<Session>,
    failed_attempts: u32,
    locked_until: Option<Instant>,
    lockout_delay: Duration,
}

/// Single-session gate over an [`AccountStore`].
///
/// All methods take `&self` and serialize on one internal lock, so
/// concurrent logins cannot both succeed.
#[derive(Debug)]
pub struct SessionManager {
    store: AccountStore,
    policy: LockoutPolicy,
    state: Mutex<ManagerState>,
}

impl SessionManager {
    pub fn new(store: AccountStore) -> Self {
        Self::with_policy(store, LockoutPolicy::default())
    }

    pub fn with_policy(store: AccountStore, policy: LockoutPolicy) -> Self {
        let state = ManagerState {
            session: None,
            failed_attempts: 0,
            locked_until: None,
            lockout_delay: policy.base_delay,
        };
        Self {
            store,
            policy,
            state: Mutex::new(state),
        }
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, ManagerState>> {
        self.state
            .lock()
            .map_err(|_| DevlogsError::Storage("Session state poisoned".to_string()))
    }

    /// Unlock `username` and make it the active session.
    ///
    /// # Errors
    ///
    /// - `SessionOngoing` if a session is already active
    /// - `TooManyAttempts` during a lockout episode (no file is read)
    /// - `InvalidCredentials` / `InvalidAccountFormat` on a failed unlock,
    ///   which also counts toward the lockout
    /// - `AccountNotFound` and I/O errors, which do not count
    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        let mut state = self.lock_state()?;
        if state.session.is_some() {
            return Err(DevlogsError::SessionOngoing);
        }

        if let Some(until) = state.locked_until {
            let now = Instant::now();
            if now < until {
                return Err(DevlogsError::TooManyAttempts {
                    retry_after: until - now,
                });
            }
            state.locked_until = None;
            info!("login lockout lifted");
        }

        match self.store.load(username, password) {
            Ok(account) => {
                state.failed_attempts = 0;
                state.lockout_delay = self.policy.base_delay;
                state.session = Some(Session::new(account));
                info!(username = %username, "session started");
                Ok(())
            }
            Err(err) if err.is_auth_failure() => {
                state.failed_attempts = state.failed_attempts.saturating_add(1);
                warn!(
                    username = %username,
                    attempts = state.failed_attempts,
                    "failed login"
                );
                if state.failed_attempts >= self.policy.max_attempts {
                    let delay = state.lockout_delay;
                    state.locked_until = Some(Instant::now() + delay);
                    state.lockout_delay = delay + self.policy.delay_increment;
                    warn!(seconds = delay.as_secs_f64(), "too many failed logins, locking out");
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Save the active account, then end the session.
    ///
    /// If the save fails the session stays active.
    pub fn logout(&self) -> Result<()> {
        let mut state = self.lock_state()?;
        let session = state.session.as_ref().ok_or(DevlogsError::NoSession)?;
        self.store.save(session.account())?;
        if let Some(session) = state.session.take() {
            info!(username = %session.account.username(), "session ended");
        }
        Ok(())
    }

    /// End the session without writing anything.
    pub fn discard(&self) -> Result<()> {
        let mut state = self.lock_state()?;
        let session = state.session.take().ok_or(DevlogsError::NoSession)?;
        info!(username = %session.account.username(), "session discarded");
        Ok(())
    }

    /// Persist the active account.
    pub fn save_current(&self) -> Result<()> {
        self.with_session(|session| self.store.save(&session.account))?
    }

    pub fn is_active(&self) -> Result<bool> {
        Ok(self.lock_state()?.session.is_some())
    }

    pub fn current_username(&self) -> Result<Option<String>> {
        Ok(self
            .lock_state()?
            .session
            .as_ref()
            .map(|session| session.account.username().to_string()))
    }

    /// Login time of the active session, in nanoseconds since the Unix epoch.
    pub fn session_started_at(&self) -> Result<Option<u64>> {
        Ok(self.lock_state()?.session.as_ref().map(Session::started_at))
    }

    pub fn failed_attempts(&self) -> Result<u32> {
        Ok(self.lock_state()?.failed_attempts)
    }

    /// Time left in the current lockout episode, if any.
    pub fn lockout_remaining(&self) -> Result<Option<Duration>> {
        let state = self.lock_state()?;
        let now = Instant::now();
        Ok(state
            .locked_until
            .filter(|until| *until > now)
            .map(|until| until - now))
    }

    pub fn is_locked_out(&self) -> Result<bool> {
        Ok(self.lockout_remaining()?.is_some())
    }

    fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> Result<R> {
        let state = self.lock_state()?;
        let session = state.session.as_ref().ok_or(DevlogsError::NoSession)?;
        Ok(f(session))
    }

    fn with_account_mut<R>(&self, f: impl FnOnce(&mut Account) -> Result<R>) -> Result<R> {
        let mut state = self.lock_state()?;
        let session = state.session.as_mut().ok_or(DevlogsError::NoSession)?;
        f(&mut session.account)
    }

    // --- Entry operations on the active account ---

    /// Snapshot of the active account's entries.
    pub fn entries(&self) -> Result<Vec<Entry>> {
        self.with_session(|session| session.account.entries().to_vec())
    }

    pub fn add_entry(&self, title: &str, body: &str) -> Result<Entry> {
        self.with_account_mut(|account| account.add_entry(title, body).cloned())
    }

    pub fn update_entry(&self, index: usize, title: &str, body: &str) -> Result<Entry> {
        self.with_account_mut(|account| account.update_entry(index, title, body).cloned())
    }

    pub fn delete_entry(&self, index: usize) -> Result<Entry> {
        self.with_account_mut(|account| account.delete_entry(index))
    }

    pub fn move_entry_up(&self, index: usize) -> Result<()> {
        self.with_account_mut(|account| account.move_entry_up(index))
    }

    pub fn move_entry_down(&self, index: usize) -> Result<()> {
        self.with_account_mut(|account| account.move_entry_down(index))
    }
}
