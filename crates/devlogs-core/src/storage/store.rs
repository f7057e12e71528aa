//! On-disk account directory.
//!
//! One file per account, named after the sanitized username with an
//! `.account` extension. No locking is done across processes; two writers on
//! the same file can corrupt it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{DevlogsError, Result};
use crate::fs::{truncate_and_remove, write_atomic};
use crate::storage::account::{validate_username, Account};

/// File extension for account files.
pub const ACCOUNT_EXTENSION: &str = "account";

/// Characters that are percent-encoded in account filenames.
const FILTERED_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|', '%'];

/// Percent-encode filesystem-unsafe characters (`/` becomes `%2F`).
///
/// `%` itself is encoded so distinct usernames never share a filename.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if FILTERED_CHARS.contains(&c) {
            out.push_str(&format!("%{:X}", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

/// Directory holding every account file.
#[derive(Debug, Clone)]
pub struct AccountStore {
    dir: PathBuf,
}

impl AccountStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for `username`, whether or not it exists.
    pub fn path_for(&self, username: &str) -> PathBuf {
        self.dir.join(format!(
            "{}.{}",
            sanitize_filename(username),
            ACCOUNT_EXTENSION
        ))
    }

    pub fn exists(&self, username: &str) -> bool {
        self.path_for(username).is_file()
    }

    /// Sign up: build a fresh account and write its file.
    ///
    /// Without `overwrite`, an existing file is probed with `password` first:
    /// if it decrypts the result is `AccountExists`, otherwise
    /// `InvalidAccountFormat`.
    pub fn create(&self, username: &str, password: &str, overwrite: bool) -> Result<Account> {
        validate_username(username)?;

        let path = self.path_for(username);
        if !overwrite && path.is_file() {
            return match self.check_auth(username, password)? {
                true => Err(DevlogsError::AccountExists(username.to_string())),
                false => Err(DevlogsError::InvalidAccountFormat(format!(
                    "Existing file for {} cannot be opened",
                    username
                ))),
            };
        }

        let account = Account::new(username, password)?;
        self.save(&account)?;
        info!(username = %username, "created account");
        Ok(account)
    }

    /// Decrypt and parse the account file for `username`.
    pub fn load(&self, username: &str, password: &str) -> Result<Account> {
        let path = self.path_for(username);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(DevlogsError::AccountNotFound(username.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), bytes = data.len(), "read account file");
        Account::from_bytes(&data, password)
    }

    /// Write the account file atomically.
    pub fn save(&self, account: &Account) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let data = account.to_bytes()?;
        let path = self.path_for(account.username());
        write_atomic(&path, &data)?;
        debug!(path = %path.display(), bytes = data.len(), "saved account");
        Ok(())
    }

    /// Empty the account file, then unlink it.
    pub fn delete(&self, username: &str) -> Result<()> {
        let path = self.path_for(username);
        match truncate_and_remove(&path) {
            Ok(()) => {
                info!(username = %username, "deleted account");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(DevlogsError::AccountNotFound(username.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Whether `password` unlocks the account file.
    ///
    /// Checks the envelope and the embedded key; entries are not parsed. A
    /// missing file means "not authenticated" rather than an error.
    pub fn check_auth(&self, username: &str, password: &str) -> Result<bool> {
        let data = match fs::read(self.path_for(username)) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        match Account::verify(&data, password) {
            Ok(()) => Ok(true),
            Err(err) if err.is_auth_failure() => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("alice"), "alice");
        assert_eq!(sanitize_filename("a/b"), "a%2Fb");
        assert_eq!(sanitize_filename("100%"), "100%25");
        assert_eq!(
            sanitize_filename(r#"\/:*?"<>|"#),
            "%5C%2F%3A%2A%3F%22%3C%3E%7C"
        );
        assert_eq!(sanitize_filename("zoë.log"), "zoë.log");
    }

    #[test]
    fn test_sanitized_names_do_not_collide() {
        assert_ne!(sanitize_filename("a/b"), sanitize_filename("a%2Fb"));
    }

    #[test]
    fn test_path_for() {
        let store = AccountStore::new("/data/accounts");
        assert_eq!(
            store.path_for("a:b"),
            PathBuf::from("/data/accounts/a%3Ab.account")
        );
    }

    #[test]
    fn test_create_writes_file() {
        let dir = tempdir().unwrap();
        let store = AccountStore::new(dir.path().join("accounts"));

        let account = store.create("alice", "hunter2", false).unwrap();
        assert!(account.entries().is_empty());
        assert!(store.exists("alice"));
    }

    #[test]
    fn test_create_existing_same_password() {
        let dir = tempdir().unwrap();
        let store = AccountStore::new(dir.path());
        store.create("alice", "hunter2", false).unwrap();

        let result = store.create("alice", "hunter2", false);
        assert!(matches!(result, Err(DevlogsError::AccountExists(_))));
    }

    #[test]
    fn test_create_existing_corrupt_file() {
        let dir = tempdir().unwrap();
        let store = AccountStore::new(dir.path());
        fs::write(store.path_for("alice"), b"definitely not an account").unwrap();

        let result = store.create("alice", "hunter2", false);
        assert!(matches!(result, Err(DevlogsError::InvalidAccountFormat(_))));
    }

    #[test]
    fn test_create_overwrite() {
        let dir = tempdir().unwrap();
        let store = AccountStore::new(dir.path());
        let mut first = store.create("alice", "old", false).unwrap();
        first.add_entry("kept?", "no").unwrap();
        store.save(&first).unwrap();

        store.create("alice", "new", true).unwrap();
        let loaded = store.load("alice", "new").unwrap();
        assert!(loaded.entries().is_empty());
        assert!(store.load("alice", "old").unwrap_err().is_auth_failure());
    }

    #[test]
    fn test_create_rejects_long_username() {
        let dir = tempdir().unwrap();
        let store = AccountStore::new(dir.path());
        let result = store.create(&"x".repeat(33), "pw", false);
        assert!(matches!(result, Err(DevlogsError::InvalidUsername(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_load_missing_account() {
        let dir = tempdir().unwrap();
        let store = AccountStore::new(dir.path());
        let result = store.load("ghost", "pw");
        assert!(matches!(result, Err(DevlogsError::AccountNotFound(name)) if name == "ghost"));
    }

    #[test]
    fn test_delete_account() {
        let dir = tempdir().unwrap();
        let store = AccountStore::new(dir.path());
        store.create("alice", "pw", false).unwrap();

        store.delete("alice").unwrap();
        assert!(!store.exists("alice"));

        let result = store.delete("alice");
        assert!(matches!(result, Err(DevlogsError::AccountNotFound(_))));
    }

    #[test]
    fn test_check_auth() {
        let dir = tempdir().unwrap();
        let store = AccountStore::new(dir.path());
        store.create("alice", "hunter2", false).unwrap();

        assert!(store.check_auth("alice", "hunter2").unwrap());
        assert!(!store.check_auth("nobody", "hunter2").unwrap());
    }
}
