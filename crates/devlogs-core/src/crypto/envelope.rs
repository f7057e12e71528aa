//! AES-256-CBC envelope for account bodies.
//!
//! Layout: `IV (16) || ciphertext`, PKCS#7 padded to the 16-byte block.
//! There is no authentication tag. Tampering is only noticed when it breaks
//! the padding or the account layout after decryption.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::crypto::key::{DerivedKey, KEY_LENGTH};
use crate::error::{DevlogsError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Cipher block and IV width.
pub const BLOCK_SIZE: usize = 16;

/// Single-use cipher key.
///
/// `encrypt` and `decrypt` consume the key, so one instance performs at most
/// one operation. The key bytes are zeroized on drop.
#[derive(ZeroizeOnDrop)]
pub struct EnvelopeKey {
    key: [u8; KEY_LENGTH],
}

impl EnvelopeKey {
    pub fn new(key: &DerivedKey) -> Self {
        Self {
            key: *key.as_bytes(),
        }
    }

    /// Encrypt `plaintext` under a fresh random IV.
    ///
    /// # Examples
    ///
    /// ```
    /// use devlogs_core::crypto::{derive_key, EnvelopeKey, Salt};
    ///
    /// let key = derive_key("hunter2", &Salt::generate().unwrap());
    /// let sealed = EnvelopeKey::new(&key).encrypt(b"secret").unwrap();
    /// let opened = EnvelopeKey::new(&key).decrypt(&sealed).unwrap();
    /// assert_eq!(opened.as_slice(), b"secret");
    /// ```
    pub fn encrypt(self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut iv = [0u8; BLOCK_SIZE];
        getrandom::getrandom(&mut iv)
            .map_err(|e| DevlogsError::Crypto(format!("Failed to generate IV: {}", e)))?;

        let ciphertext = Aes256CbcEnc::new((&self.key).into(), (&iv).into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut out = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
        out.extend_from_slice(&iv);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypt `IV || ciphertext`.
    ///
    /// # Errors
    ///
    /// - `DevlogsError::Crypto` if the input is too short or not block aligned
    /// - `DevlogsError::BadPadding` if the padding is invalid, which is what a
    ///   wrong key usually produces
    pub fn decrypt(self, data: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if data.len() < BLOCK_SIZE {
            return Err(DevlogsError::Crypto(format!(
                "Ciphertext too short for IV ({} bytes)",
                data.len()
            )));
        }
        let (iv, ciphertext) = data.split_at(BLOCK_SIZE);
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(DevlogsError::Crypto(format!(
                "Ciphertext length {} is not a positive multiple of {}",
                ciphertext.len(),
                BLOCK_SIZE
            )));
        }

        let plaintext = Aes256CbcDec::new((&self.key).into(), iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| DevlogsError::BadPadding)?;
        Ok(Zeroizing::new(plaintext))
    }
}
