//! Account record, its encrypted file layout, and entry ordering.
//!
//! Plaintext body (before encryption):
//!
//! ```text
//! [32] username, UTF-8, zero-padded on the right
//! [32] derived key
//! [8]  created_at (ns)
//! [2]  entry count
//! per entry:
//!     [3] entry length
//!     [n] entry bytes (see `entry`)
//! ```
//!
//! File layout: `[32] salt || IV || AES-256-CBC(derived key, body)`.

use tracing::debug;
use zeroize::Zeroizing;

use crate::codec::{encode_uint, utf8, Reader};
use crate::crypto::{derive_key, DerivedKey, EnvelopeKey, Salt, KEY_LENGTH};
use crate::error::{DevlogsError, Result};
use crate::storage::entry::{self, now_ns, Entry};

/// Maximum username length in bytes.
pub const MAX_USERNAME_BYTES: usize = 32;

/// Maximum number of entries (two-byte count).
pub const MAX_ENTRIES: usize = 0xFFFF;

/// Smallest valid plaintext body: username, key, created_at, entry count.
pub const MIN_BODY_BYTES: usize = MAX_USERNAME_BYTES + KEY_LENGTH + 8 + 2;

/// A user's account with its ordered entries.
pub struct Account {
    username: String,
    derived_key: DerivedKey,
    salt: Salt,
    created_at: u64,
    entries: Vec<Entry>,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

pub(crate) fn validate_username(username: &str) -> Result<()> {
    if username.len() > MAX_USERNAME_BYTES {
        return Err(DevlogsError::InvalidUsername(format!(
            "Username is too long ({} bytes, max {})",
            username.len(),
            MAX_USERNAME_BYTES
        )));
    }
    Ok(())
}

impl Account {
    /// Fresh account with no entries, keyed under a new random salt.
    pub fn new(username: &str, password: &str) -> Result<Self> {
        validate_username(username)?;
        let salt = Salt::generate()?;
        let derived_key = derive_key(password, &salt);

        Ok(Self {
            username: username.to_string(),
            derived_key,
            salt,
            created_at: now_ns(),
            entries: Vec::new(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Result<&Entry> {
        self.entries
            .get(index)
            .ok_or(DevlogsError::EntryNotFound(index))
    }

    // --- Entry operations ---

    /// Append an entry at the end of the list.
    pub fn add_entry(&mut self, title: &str, body: &str) -> Result<&Entry> {
        entry::validate_content(title, body)?;
        if self.entries.len() >= MAX_ENTRIES {
            return Err(DevlogsError::InvalidEntry(format!(
                "Account already holds the maximum of {} entries",
                MAX_ENTRIES
            )));
        }
        let position = self.entries.len() as u32;
        self.entries.push(Entry::new(title, body, position));
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Replace the content of the entry at `index`.
    pub fn update_entry(&mut self, index: usize, title: &str, body: &str) -> Result<&Entry> {
        entry::validate_content(title, body)?;
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(DevlogsError::EntryNotFound(index))?;
        entry.update(title.to_string(), body.to_string());
        Ok(entry)
    }

    /// Remove the entry at `index`; later entries move up one position.
    pub fn delete_entry(&mut self, index: usize) -> Result<Entry> {
        if index >= self.entries.len() {
            return Err(DevlogsError::EntryNotFound(index));
        }
        let removed = self.entries.remove(index);
        for entry in &mut self.entries[index..] {
            entry.set_position(entry.position().saturating_sub(1));
        }
        Ok(removed)
    }

    /// Swap the entry at `index` with the one above it. No-op for the first.
    ///
    /// Positions are shifted relative to their stored values rather than
    /// renumbered from list order.
    pub fn move_entry_up(&mut self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(DevlogsError::EntryNotFound(index));
        }
        if index == 0 {
            return Ok(());
        }
        let moved = &mut self.entries[index];
        moved.set_position(moved.position().saturating_sub(1));
        self.entries.swap(index - 1, index);
        let displaced = &mut self.entries[index];
        displaced.set_position(displaced.position().saturating_add(1));
        Ok(())
    }

    /// Swap the entry at `index` with the one below it. No-op for the last.
    pub fn move_entry_down(&mut self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(DevlogsError::EntryNotFound(index));
        }
        if index + 1 == self.entries.len() {
            return Ok(());
        }
        let moved = &mut self.entries[index];
        moved.set_position(moved.position().saturating_add(1));
        self.entries.swap(index, index + 1);
        let displaced = &mut self.entries[index];
        displaced.set_position(displaced.position().saturating_sub(1));
        Ok(())
    }

    // --- Serialization ---

    fn body_bytes(&self) -> Zeroizing<Vec<u8>> {
        let entries_len: usize = self.entries.iter().map(|e| 3 + e.encoded_len()).sum();
        let mut body = Zeroizing::new(Vec::with_capacity(MIN_BODY_BYTES + entries_len));

        let mut username = self.username.as_bytes().to_vec();
        username.resize(MAX_USERNAME_BYTES, 0);
        body.extend_from_slice(&username);
        body.extend_from_slice(self.derived_key.as_bytes());
        body.extend(encode_uint(self.created_at, 8));
        body.extend(encode_uint(self.entries.len() as u64, 2));
        for entry in &self.entries {
            let bytes = Zeroizing::new(entry.to_bytes());
            body.extend(encode_uint(bytes.len() as u64, 3));
            body.extend_from_slice(&bytes);
        }
        body
    }

    /// Encrypt the account into its file representation.
    ///
    /// Uses the current salt and key; a new random IV is drawn every time.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let body = self.body_bytes();
        let ciphertext = EnvelopeKey::new(&self.derived_key).encrypt(&body)?;

        let mut out = Vec::with_capacity(KEY_LENGTH + ciphertext.len());
        out.extend_from_slice(self.salt.as_bytes());
        out.extend_from_slice(&ciphertext);
        debug!(
            entries = self.entries.len(),
            bytes = out.len(),
            "serialized account"
        );
        Ok(out)
    }

    /// Decrypt the stored body with the key for `password`.
    ///
    /// Only the envelope is checked; the layout is not parsed. Returns the
    /// plaintext and the key it was decrypted with.
    pub(crate) fn unlock(
        data: &[u8],
        password: &str,
    ) -> Result<(Zeroizing<Vec<u8>>, DerivedKey)> {
        if data.len() < KEY_LENGTH {
            return Err(DevlogsError::InvalidAccountFormat(format!(
                "File too short for salt ({} bytes)",
                data.len()
            )));
        }
        let (salt_bytes, ciphertext) = data.split_at(KEY_LENGTH);
        let mut salt = [0u8; KEY_LENGTH];
        salt.copy_from_slice(salt_bytes);
        let candidate = derive_key(password, &Salt::from_bytes(salt));

        let body = EnvelopeKey::new(&candidate)
            .decrypt(ciphertext)
            .map_err(|err| match err {
                DevlogsError::BadPadding => DevlogsError::InvalidCredentials,
                DevlogsError::Crypto(msg) => DevlogsError::InvalidAccountFormat(msg),
                other => other,
            })?;
        Ok((body, candidate))
    }

    /// Check `password` against an account file without parsing entries.
    pub(crate) fn verify(data: &[u8], password: &str) -> Result<()> {
        let (body, candidate) = Self::unlock(data, password)?;
        let stored_key = body
            .get(MAX_USERNAME_BYTES..MAX_USERNAME_BYTES + KEY_LENGTH)
            .ok_or_else(|| {
                DevlogsError::InvalidAccountFormat(format!(
                    "Decrypted body too short ({} bytes)",
                    body.len()
                ))
            })?;
        if candidate.matches(stored_key) {
            Ok(())
        } else {
            Err(DevlogsError::InvalidCredentials)
        }
    }

    /// Decrypt and parse an account file.
    ///
    /// On success the salt is replaced by a fresh one and the key re-derived
    /// under it, so the next save never reuses the salt that was read.
    pub fn from_bytes(data: &[u8], password: &str) -> Result<Self> {
        let (body, candidate) = Self::unlock(data, password)?;

        let mut reader = Reader::new(&body);
        let username_bytes = reader.take(MAX_USERNAME_BYTES, "username")?;
        let stored_key = reader.take(KEY_LENGTH, "derived key")?;
        // Noise from a wrong key that happened to leave valid padding
        if !candidate.matches(stored_key) {
            return Err(DevlogsError::InvalidCredentials);
        }
        if body.len() < MIN_BODY_BYTES {
            return Err(DevlogsError::InvalidAccountFormat(format!(
                "Decrypted body too short ({} bytes, need {})",
                body.len(),
                MIN_BODY_BYTES
            )));
        }

        let end = username_bytes
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        let username = utf8(&username_bytes[..end], "username")?;
        let created_at = reader.uint(8, "created_at")?;
        let count = reader.uint(2, "entry count")? as usize;

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let len = reader.uint(3, "entry length")? as usize;
            entries.push(Entry::from_bytes(reader.take(len, "entry")?)?);
        }

        let salt = Salt::generate()?;
        let derived_key = derive_key(password, &salt);
        debug!(entries = entries.len(), "loaded account");

        Ok(Self {
            username,
            derived_key,
            salt,
            created_at,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(account: &Account) -> Vec<&str> {
        account.entries().iter().map(|e| e.title()).collect()
    }

    fn positions(account: &Account) -> Vec<u32> {
        account.entries().iter().map(|e| e.position()).collect()
    }

    fn abc() -> Account {
        let mut account = Account::new("alice", "hunter2").unwrap();
        for title in ["A", "B", "C"] {
            account.add_entry(title, "").unwrap();
        }
        account
    }

    #[test]
    fn test_username_length_limit() {
        assert!(Account::new(&"a".repeat(32), "pw").is_ok());
        let result = Account::new(&"a".repeat(33), "pw");
        assert!(matches!(result, Err(DevlogsError::InvalidUsername(_))));

        // Multi-byte characters count by bytes: 11 x 3 = 33
        let result = Account::new(&"€".repeat(11), "pw");
        assert!(matches!(result, Err(DevlogsError::InvalidUsername(_))));
    }

    #[test]
    fn test_add_entry_assigns_positions() {
        let account = abc();
        assert_eq!(titles(&account), vec!["A", "B", "C"]);
        assert_eq!(positions(&account), vec![0, 1, 2]);
    }

    #[test]
    fn test_add_entry_rejects_long_title() {
        let mut account = Account::new("alice", "pw").unwrap();
        let result = account.add_entry(&"t".repeat(256), "body");
        assert!(matches!(result, Err(DevlogsError::InvalidEntry(_))));
        assert!(account.entries().is_empty());
    }

    #[test]
    fn test_entry_count_limit() {
        let mut account = Account::new("alice", "pw").unwrap();
        for _ in 0..MAX_ENTRIES {
            account.add_entry("", "").unwrap();
        }
        let result = account.add_entry("one more", "");
        assert!(matches!(result, Err(DevlogsError::InvalidEntry(_))));
        assert_eq!(account.entries().len(), MAX_ENTRIES);

        // A full two-byte count survives a round trip
        let bytes = account.to_bytes().unwrap();
        let loaded = Account::from_bytes(&bytes, "pw").unwrap();
        assert_eq!(loaded.entries().len(), MAX_ENTRIES);
        assert_eq!(
            loaded.entries().last().map(|e| e.position()),
            Some(MAX_ENTRIES as u32 - 1)
        );
    }

    #[test]
    fn test_update_entry() {
        let mut account = abc();
        let before = account.entry(1).unwrap().created_at();
        account.update_entry(1, "B2", "new body").unwrap();
        let entry = account.entry(1).unwrap();
        assert_eq!(entry.title(), "B2");
        assert_eq!(entry.body(), "new body");
        assert_eq!(entry.created_at(), before);
        assert_eq!(entry.position(), 1);

        assert!(matches!(
            account.update_entry(9, "x", "y"),
            Err(DevlogsError::EntryNotFound(9))
        ));
    }

    #[test]
    fn test_delete_middle_entry() {
        let mut account = abc();
        let removed = account.delete_entry(1).unwrap();
        assert_eq!(removed.title(), "B");
        assert_eq!(titles(&account), vec!["A", "C"]);
        assert_eq!(positions(&account), vec![0, 1]);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut account = abc();
        assert!(matches!(
            account.delete_entry(3),
            Err(DevlogsError::EntryNotFound(3))
        ));
    }

    #[test]
    fn test_move_up_first_is_noop() {
        let mut account = abc();
        account.move_entry_up(0).unwrap();
        assert_eq!(titles(&account), vec!["A", "B", "C"]);
        assert_eq!(positions(&account), vec![0, 1, 2]);
    }

    #[test]
    fn test_move_down_last_is_noop() {
        let mut account = abc();
        account.move_entry_down(2).unwrap();
        assert_eq!(titles(&account), vec!["A", "B", "C"]);
        assert_eq!(positions(&account), vec![0, 1, 2]);
    }

    #[test]
    fn test_move_up_swaps_with_previous() {
        let mut account = abc();
        account.move_entry_up(1).unwrap();
        assert_eq!(titles(&account), vec!["B", "A", "C"]);
        assert_eq!(positions(&account), vec![0, 1, 2]);
    }

    #[test]
    fn test_move_down_swaps_with_next() {
        let mut account = abc();
        account.move_entry_down(0).unwrap();
        assert_eq!(titles(&account), vec!["B", "A", "C"]);
        assert_eq!(positions(&account), vec![0, 1, 2]);
    }

    #[test]
    fn test_move_out_of_range() {
        let mut account = abc();
        assert!(matches!(
            account.move_entry_up(5),
            Err(DevlogsError::EntryNotFound(5))
        ));
        assert!(matches!(
            account.move_entry_down(5),
            Err(DevlogsError::EntryNotFound(5))
        ));
    }

    #[test]
    fn test_body_layout() {
        let mut account = Account::new("bob", "pw").unwrap();
        account.add_entry("Day 1", "Hello").unwrap();
        let body = account.body_bytes();

        assert_eq!(&body[..3], b"bob");
        assert!(body[3..32].iter().all(|&b| b == 0));
        assert_eq!(&body[32..64], account.derived_key.as_bytes());
        assert_eq!(&body[72..74], &[0, 1]);
        let entry_len = account.entries()[0].encoded_len();
        assert_eq!(&body[74..77], &encode_uint(entry_len as u64, 3)[..]);
        assert_eq!(body.len(), MIN_BODY_BYTES + 3 + entry_len);
    }

    #[test]
    fn test_round_trip() {
        let mut account = Account::new("alice", "hunter2").unwrap();
        account.add_entry("Day 1", "Hello").unwrap();
        account.add_entry("Day 2", "Ünïcödé body\nwith lines").unwrap();

        let bytes = account.to_bytes().unwrap();
        assert_eq!(&bytes[..KEY_LENGTH], account.salt().as_bytes());

        let loaded = Account::from_bytes(&bytes, "hunter2").unwrap();
        assert_eq!(loaded.username(), "alice");
        assert_eq!(loaded.created_at(), account.created_at());
        assert_eq!(loaded.entries(), account.entries());
        assert_ne!(loaded.salt(), account.salt());
    }

    #[test]
    fn test_rotated_salt_still_unlocks() {
        let account = Account::new("alice", "hunter2").unwrap();
        let loaded = Account::from_bytes(&account.to_bytes().unwrap(), "hunter2").unwrap();
        let reloaded = Account::from_bytes(&loaded.to_bytes().unwrap(), "hunter2").unwrap();
        assert_eq!(reloaded.username(), "alice");
        assert_ne!(reloaded.salt(), loaded.salt());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let mut account = Account::new("alice", "hunter2").unwrap();
        account.add_entry("Day 1", "Hello").unwrap();
        let bytes = account.to_bytes().unwrap();

        for attempt in ["hunter3", "", "HUNTER2", "hunter2 "] {
            let err = Account::from_bytes(&bytes, attempt).unwrap_err();
            assert!(err.is_auth_failure(), "unexpected error: {}", err);
        }
    }

    #[test]
    fn test_empty_file_is_format_error() {
        let result = Account::from_bytes(&[], "pw");
        assert!(matches!(result, Err(DevlogsError::InvalidAccountFormat(_))));
    }

    #[test]
    fn test_truncated_file_is_format_error() {
        let bytes = Account::new("alice", "pw").unwrap().to_bytes().unwrap();
        let result = Account::from_bytes(&bytes[..KEY_LENGTH + 8], "pw");
        assert!(matches!(result, Err(DevlogsError::InvalidAccountFormat(_))));
    }

    #[test]
    fn test_short_body_is_format_error() {
        let salt = Salt::generate().unwrap();
        let key = derive_key("pw", &salt);
        let mut data = salt.as_bytes().to_vec();
        data.extend(EnvelopeKey::new(&key).encrypt(&[0u8; 10]).unwrap());

        let result = Account::from_bytes(&data, "pw");
        assert!(matches!(result, Err(DevlogsError::InvalidAccountFormat(_))));
    }

    #[test]
    fn test_entry_count_overrun_is_format_error() {
        let account = Account::new("alice", "pw").unwrap();
        let mut body = account.body_bytes().to_vec();
        // Claim two entries with none present
        body[72] = 0;
        body[73] = 2;
        let mut data = account.salt().as_bytes().to_vec();
        data.extend(EnvelopeKey::new(&account.derived_key).encrypt(&body).unwrap());

        let result = Account::from_bytes(&data, "pw");
        assert!(matches!(result, Err(DevlogsError::InvalidAccountFormat(_))));
    }

    #[test]
    fn test_verify() {
        let bytes = Account::new("alice", "hunter2").unwrap().to_bytes().unwrap();
        assert!(Account::verify(&bytes, "hunter2").is_ok());
        assert!(Account::verify(&bytes, "nope").unwrap_err().is_auth_failure());

        let salt = Salt::generate().unwrap();
        let key = derive_key("pw", &salt);
        let mut data = salt.as_bytes().to_vec();
        data.extend(EnvelopeKey::new(&key).encrypt(&[0u8; 40]).unwrap());
        assert!(matches!(
            Account::verify(&data, "pw"),
            Err(DevlogsError::InvalidAccountFormat(_))
        ));
    }

    #[test]
    fn test_unlock_does_not_parse() {
        let salt = Salt::generate().unwrap();
        let key = derive_key("pw", &salt);
        let mut data = salt.as_bytes().to_vec();
        data.extend(EnvelopeKey::new(&key).encrypt(b"not an account").unwrap());

        let (body, used) = Account::unlock(&data, "pw").unwrap();
        assert_eq!(body.as_slice(), b"not an account");
        assert_eq!(used.as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_debug_hides_key() {
        let account = Account::new("alice", "pw").unwrap();
        let output = format!("{:?}", account);
        assert!(output.contains("alice"));
        assert!(!output.contains(&hex::encode(&account.derived_key.as_bytes()[..4])));
    }
}
