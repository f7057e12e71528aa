//! Fixed-width big-endian integer packing.
//!
//! Every integer field in the entry and account layouts is written as
//! `fix_length(number_to_bytes(n), width)`. Reads go through [`Reader`],
//! which turns any overrun into `InvalidAccountFormat`.

use crate::error::{DevlogsError, Result};

/// Minimal big-endian encoding of `n`.
///
/// No leading zero bytes are emitted, except that zero itself encodes as a
/// single `0x00` byte.
pub fn number_to_bytes(n: u64) -> Vec<u8> {
    let bytes = n.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
    bytes[first..].to_vec()
}

/// Big-endian decode. Empty input decodes to 0.
///
/// Inputs wider than eight bytes keep only their low eight bytes.
pub fn bytes_to_number(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Force `bytes` to exactly `width` bytes.
///
/// Shorter input is left-padded with zeros. Longer input loses its leading
/// bytes, silently.
pub fn fix_length(bytes: &[u8], width: usize) -> Vec<u8> {
    if bytes.len() > width {
        bytes[bytes.len() - width..].to_vec()
    } else {
        let mut out = vec![0u8; width - bytes.len()];
        out.extend_from_slice(bytes);
        out
    }
}

/// Encode `n` into a fixed-width big-endian field.
pub fn encode_uint(n: u64, width: usize) -> Vec<u8> {
    fix_length(&number_to_bytes(n), width)
}

/// Bounds-checked cursor over a decrypted buffer.
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Take the next `len` bytes, naming `field` in the error on overrun.
    pub fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                DevlogsError::InvalidAccountFormat(format!(
                    "{} needs {} bytes at offset {}, only {} left",
                    field,
                    len,
                    self.pos,
                    self.remaining()
                ))
            })?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn uint(&mut self, width: usize, field: &str) -> Result<u64> {
        self.take(width, field).map(bytes_to_number)
    }

    /// Everything not yet consumed.
    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

/// Decode a UTF-8 field, mapping failures to `InvalidAccountFormat`.
pub fn utf8(bytes: &[u8], field: &str) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| DevlogsError::InvalidAccountFormat(format!("{} is not UTF-8: {}", field, e)))
}
