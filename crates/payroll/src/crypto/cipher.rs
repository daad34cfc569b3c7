//! AES-GCM encryption and decryption of short string fields.
//!
//! A fresh random 96-bit nonce is drawn from the OS CSPRNG on every call and the
//! 128-bit authentication tag is appended to the ciphertext. The AES variant is
//! chosen from the key length (16, 24 or 32 bytes).
//!
//! **Never cache or derive the nonce.** GCM nonce reuse under one key breaks both
//! confidentiality and authentication.

use std::fmt;
use std::str::FromStr;

use aes_gcm::{
    aead::{self, consts::U12, rand_core::RngCore, Aead, KeyInit, OsRng},
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{ErrorReason, ServiceError};
use thiserror::Error;

use crate::keys::SymmetricKey;

/// Byte length of the GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Separator between the nonce and ciphertext segments.
pub const SEPARATOR: char = '$';

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Errors produced by the cipher layer.
///
/// Carries no detail: a decryption failure caused by a wrong key, a
/// corrupted value, or tampering is indistinguishable to every caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed")]
    DecryptionFailed,
}

impl CryptoError {
    pub fn reason(self) -> ErrorReason {
        match self {
            CryptoError::EncryptionFailed => ErrorReason::EncryptionFailed,
            CryptoError::DecryptionFailed => ErrorReason::DecryptionFailed,
        }
    }
}

impl From<CryptoError> for ServiceError {
    fn from(err: CryptoError) -> Self {
        ServiceError::Internal(err.reason())
    }
}

/// A parsed, encrypted field value.
///
/// The string representation is `<base64(nonce)>$<base64(ciphertext+tag)>` using
/// the standard alphabet with padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCiphertext {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw ciphertext + authentication tag bytes.
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for EncodedCiphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            STANDARD.encode(self.nonce),
            SEPARATOR,
            STANDARD.encode(&self.ciphertext)
        )
    }
}

impl FromStr for EncodedCiphertext {
    type Err = CryptoError;

    /// Parse the textual form.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::DecryptionFailed`] unless the input holds exactly one
    /// separator, both segments are valid padded base64, and the nonce is
    /// [`NONCE_LEN`] bytes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(SEPARATOR);
        let (Some(nonce_b64), Some(ct_b64), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CryptoError::DecryptionFailed);
        };

        let nonce: [u8; NONCE_LEN] = STANDARD
            .decode(nonce_b64)
            .map_err(|_| CryptoError::DecryptionFailed)?
            .try_into()
            .map_err(|_| CryptoError::DecryptionFailed)?;

        let ciphertext = STANDARD
            .decode(ct_b64)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        Ok(Self { nonce, ciphertext })
    }
}

/// AES-GCM keyed for one of the three AES key sizes.
enum KeyedCipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl KeyedCipher {
    fn new(key: &[u8]) -> Option<Self> {
        match key.len() {
            16 => Aes128Gcm::new_from_slice(key).ok().map(Self::Aes128),
            24 => Aes192Gcm::new_from_slice(key).ok().map(Self::Aes192),
            32 => Aes256Gcm::new_from_slice(key).ok().map(Self::Aes256),
            _ => None,
        }
    }

    fn seal(&self, nonce: &Nonce<U12>, plaintext: &[u8]) -> Result<Vec<u8>, aead::Error> {
        match self {
            Self::Aes128(c) => c.encrypt(nonce, plaintext),
            Self::Aes192(c) => c.encrypt(nonce, plaintext),
            Self::Aes256(c) => c.encrypt(nonce, plaintext),
        }
    }

    fn open(&self, nonce: &Nonce<U12>, ciphertext: &[u8]) -> Result<Vec<u8>, aead::Error> {
        match self {
            Self::Aes128(c) => c.decrypt(nonce, ciphertext),
            Self::Aes192(c) => c.decrypt(nonce, ciphertext),
            Self::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
    }
}

/// Encrypt a plaintext string under `key`.
///
/// # Errors
///
/// Returns [`CryptoError::EncryptionFailed`] if `key` is not a valid AES key
/// length or the AEAD operation fails.
pub fn encrypt(plaintext: &str, key: &SymmetricKey) -> Result<EncodedCiphertext, CryptoError> {
    let cipher = KeyedCipher::new(key.as_bytes()).ok_or(CryptoError::EncryptionFailed)?;

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .seal(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|_| CryptoError::EncryptionFailed)?;

    Ok(EncodedCiphertext { nonce, ciphertext })
}

/// Parse and decrypt an encoded value back to its plaintext string.
///
/// # Errors
///
/// Returns [`CryptoError::DecryptionFailed`] for malformed input, a wrong key,
/// tampered or corrupted data, and non-UTF-8 plaintext alike.
pub fn decrypt(encoded: &str, key: &SymmetricKey) -> Result<String, CryptoError> {
    let parsed: EncodedCiphertext = encoded.parse()?;
    decrypt_parsed(&parsed, key)
}

/// Decrypt an already parsed [`EncodedCiphertext`].
pub fn decrypt_parsed(field: &EncodedCiphertext, key: &SymmetricKey) -> Result<String, CryptoError> {
    let cipher = KeyedCipher::new(key.as_bytes()).ok_or(CryptoError::DecryptionFailed)?;
    let plaintext = cipher
        .open(Nonce::from_slice(&field.nonce), &field.ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_key(len: usize) -> SymmetricKey {
        let mut key = vec![0u8; len];
        OsRng.fill_bytes(&mut key);
        SymmetricKey::from_bytes(key)
    }

    /// Replace the character at `idx` with a different base64 alphabet character.
    fn flip_char(s: &str, idx: usize) -> String {
        let mut chars: Vec<char> = s.chars().collect();
        chars[idx] = if chars[idx] == 'A' { 'B' } else { 'A' };
        chars.into_iter().collect()
    }

    #[test]
    fn round_trip_all_key_sizes() {
        for len in [16, 24, 32] {
            let key = random_key(len);
            for plaintext in ["", "7007007", "2147483647", "日本語"] {
                let encoded = encrypt(plaintext, &key).unwrap().to_string();
                assert_eq!(decrypt(&encoded, &key).unwrap(), plaintext, "key len {len}");
            }
        }
    }

    #[test]
    fn ciphertext_carries_tag() {
        let key = random_key(24);
        let field = encrypt("7007007", &key).unwrap();
        assert_eq!(field.ciphertext.len(), "7007007".len() + TAG_LEN);
    }

    #[test]
    fn same_plaintext_encrypts_differently() {
        let key = random_key(24);
        let a = encrypt("7007007", &key).unwrap().to_string();
        let b = encrypt("7007007", &key).unwrap().to_string();
        assert_ne!(a, b);
        assert_eq!(decrypt(&a, &key).unwrap(), "7007007");
        assert_eq!(decrypt(&b, &key).unwrap(), "7007007");
    }

    #[test]
    fn nonce_edit_fails_decryption() {
        let key = random_key(24);
        let encoded = encrypt("7007007", &key).unwrap().to_string();
        let tampered = flip_char(&encoded, 0);
        assert_eq!(decrypt(&tampered, &key), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn any_single_character_edit_fails() {
        let key = random_key(24);
        let encoded = encrypt("7007007", &key).unwrap().to_string();
        for (idx, c) in encoded.char_indices() {
            if c == SEPARATOR {
                continue;
            }
            let tampered = flip_char(&encoded, idx);
            assert_eq!(
                decrypt(&tampered, &key),
                Err(CryptoError::DecryptionFailed),
                "edit at {idx} went undetected"
            );
        }
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let key = random_key(32);
        let mut field = encrypt("tamper me", &key).unwrap();
        // Flip a byte in the ciphertext to simulate tampering.
        field.ciphertext[0] ^= 0xFF;
        assert_eq!(decrypt_parsed(&field, &key), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let k1 = random_key(24);
        let k2 = random_key(24);
        let encoded = encrypt("secret", &k1).unwrap().to_string();
        assert_eq!(decrypt(&encoded, &k2), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn rejects_wrong_separator_count() {
        let key = random_key(24);
        let encoded = encrypt("1", &key).unwrap().to_string();
        let no_sep = encoded.replace(SEPARATOR, "");
        let two_seps = format!("{encoded}$");
        for bad in [no_sep.as_str(), two_seps.as_str(), "", "$", "$$"] {
            assert_eq!(decrypt(bad, &key), Err(CryptoError::DecryptionFailed), "{bad:?}");
        }
    }

    #[test]
    fn rejects_bad_base64() {
        assert!("!!!$abc=".parse::<EncodedCiphertext>().is_err());
        assert!("AAAAAAAAAAAAAAAA$***".parse::<EncodedCiphertext>().is_err());
    }

    #[test]
    fn rejects_short_nonce() {
        let short = format!("{}${}", STANDARD.encode([0u8; 8]), STANDARD.encode([0u8; 20]));
        assert_eq!(
            short.parse::<EncodedCiphertext>(),
            Err(CryptoError::DecryptionFailed)
        );
    }

    #[test]
    fn string_repr_round_trip() {
        let key = random_key(24);
        let field = encrypt("hello", &key).unwrap();
        let s = field.to_string();
        assert_eq!(s.matches(SEPARATOR).count(), 1);
        let parsed: EncodedCiphertext = s.parse().unwrap();
        assert_eq!(parsed, field);
    }

    #[test]
    fn invalid_key_length_rejected() {
        let key = SymmetricKey::from_bytes(vec![0u8; 20]);
        assert_eq!(encrypt("x", &key).unwrap_err(), CryptoError::EncryptionFailed);
    }

    #[test]
    fn crypto_errors_map_to_internal() {
        assert_eq!(
            ServiceError::from(CryptoError::DecryptionFailed),
            ServiceError::Internal(ErrorReason::DecryptionFailed)
        );
        assert_eq!(
            ServiceError::from(CryptoError::EncryptionFailed).http_status(),
            500
        );
    }
}
