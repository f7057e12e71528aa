//! Journal entry record and its wire format.
//!
//! ```text
//! [1]  title length in bytes
//! [n]  title (UTF-8)
//! [4]  position
//! [8]  created_at (ns)
//! [8]  updated_at (ns)
//! [..] body (UTF-8, rest of the slice)
//! ```
//!
//! The body is not length-prefixed, so decoding needs the exact slice for
//! one entry. The account layout provides it.

use crate::codec::{encode_uint, utf8, Reader};
use crate::error::{DevlogsError, Result};

/// Maximum title length in bytes (one-byte length prefix).
pub const MAX_TITLE_BYTES: usize = 0xFF;

/// Maximum encoded entry size (three-byte length prefix in the account).
pub const MAX_ENTRY_BYTES: usize = 0xFF_FFFF;

/// Fixed bytes surrounding title and body.
pub const ENTRY_HEADER_BYTES: usize = 1 + 4 + 8 + 8;

/// Current time as nanoseconds since the Unix epoch.
pub(crate) fn now_ns() -> u64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .and_then(|ns| u64::try_from(ns).ok())
        .unwrap_or_default()
}

/// A single journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    title: String,
    body: String,
    position: u32,
    created_at: u64,
    updated_at: u64,
}

impl Entry {
    /// New entry stamped with the current time. Bounds are checked by the
    /// owning account, not here.
    pub fn new(title: impl Into<String>, body: impl Into<String>, position: u32) -> Self {
        let now = now_ns();
        Self {
            title: title.into(),
            body: body.into(),
            position,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    pub(crate) fn set_position(&mut self, position: u32) {
        self.position = position;
    }

    /// Replace title and body and refresh `updated_at`.
    pub(crate) fn update(&mut self, title: String, body: String) {
        self.title = title;
        self.body = body;
        self.updated_at = now_ns().max(self.created_at);
    }

    /// Size of `to_bytes()` without building it.
    pub fn encoded_len(&self) -> usize {
        ENTRY_HEADER_BYTES + self.title.len() + self.body.len()
    }

    /// Check that the entry fits its length prefixes.
    pub fn validate(&self) -> Result<()> {
        validate_content(&self.title, &self.body)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend(encode_uint(self.title.len() as u64, 1));
        out.extend_from_slice(self.title.as_bytes());
        out.extend(encode_uint(u64::from(self.position), 4));
        out.extend(encode_uint(self.created_at, 8));
        out.extend(encode_uint(self.updated_at, 8));
        out.extend_from_slice(self.body.as_bytes());
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);
        let title_len = reader.uint(1, "entry title length")? as usize;
        let title = utf8(reader.take(title_len, "entry title")?, "entry title")?;
        let position = reader.uint(4, "entry position")? as u32;
        let created_at = reader.uint(8, "entry created_at")?;
        let updated_at = reader.uint(8, "entry updated_at")?;
        let body = utf8(reader.rest(), "entry body")?;

        Ok(Self {
            title,
            body,
            position,
            created_at,
            updated_at,
        })
    }
}

pub(crate) fn validate_content(title: &str, body: &str) -> Result<()> {
    if title.len() > MAX_TITLE_BYTES {
        return Err(DevlogsError::InvalidEntry(format!(
            "Title too long ({} bytes, max {})",
            title.len(),
            MAX_TITLE_BYTES
        )));
    }
    let total = ENTRY_HEADER_BYTES + title.len() + body.len();
    if total > MAX_ENTRY_BYTES {
        return Err(DevlogsError::InvalidEntry(format!(
            "Entry too large ({} bytes, max {})",
            total, MAX_ENTRY_BYTES
        )));
    }
    Ok(())
}
