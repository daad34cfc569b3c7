//! [`Encrypter`]: the two-operation interface the service layer encrypts through.

use std::sync::Arc;

use super::cipher::{self, CryptoError};
use crate::keys::SymmetricKey;

/// Encrypts and decrypts individual field values with the process key.
#[cfg_attr(test, mockall::automock)]
pub trait Encrypter: Send + Sync {
    /// Encrypt `plaintext` into its encoded textual form.
    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError>;

    /// Decrypt a value previously produced by [`encrypt`](Self::encrypt).
    fn decrypt(&self, encoded: &str) -> Result<String, CryptoError>;
}

/// Production [`Encrypter`] backed by AES-GCM and the shared process key.
///
/// Holds no mutable state; every call builds its own cipher and nonce, so one
/// instance can be shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AesGcmEncrypter {
    key: Arc<SymmetricKey>,
}

impl AesGcmEncrypter {
    pub fn new(key: Arc<SymmetricKey>) -> Self {
        Self { key }
    }
}

impl Encrypter for AesGcmEncrypter {
    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        cipher::encrypt(plaintext, &self.key).map(|field| field.to_string())
    }

    fn decrypt(&self, encoded: &str) -> Result<String, CryptoError> {
        cipher::decrypt(encoded, &self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{self, KeySource};

    fn encrypter() -> AesGcmEncrypter {
        AesGcmEncrypter::new(keys::load(&KeySource::EmbeddedDefault).unwrap())
    }

    #[test]
    fn salary_scenario() {
        let enc = encrypter();
        let a = enc.encrypt("7007007").unwrap();
        let b = enc.encrypt("7007007").unwrap();
        assert_ne!(a, b);
        assert_eq!(enc.decrypt(&a).unwrap(), "7007007");
        assert_eq!(enc.decrypt(&b).unwrap(), "7007007");

        let mut tampered: Vec<char> = a.chars().collect();
        tampered[3] = if tampered[3] == 'x' { 'y' } else { 'x' };
        let tampered: String = tampered.into_iter().collect();
        assert_eq!(enc.decrypt(&tampered), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn shared_across_threads() {
        let enc = Arc::new(encrypter());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let enc = Arc::clone(&enc);
                std::thread::spawn(move || {
                    let plain = (i * 1000).to_string();
                    let encoded = enc.encrypt(&plain).unwrap();
                    (plain, encoded)
                })
            })
            .collect();

        let mut seen = std::collections::HashSet::new();
        for h in handles {
            let (plain, encoded) = h.join().unwrap();
            assert!(seen.insert(encoded.clone()));
            assert_eq!(enc.decrypt(&encoded).unwrap(), plain);
        }
    }

    // Fixed vectors written under the embedded default key.
    const STORED: &str = "XtqzpMD8ZP1Ysb8y$j6MiYYMmI48oyVJ7vkAVCBVHEAbEb4zuX6vI7qsLqJtN";
    const STORED_NONCE_EDITED: &str =
        "YtqzpMD8ZP1Ysb8y$j6MiYYMmI48oyVJ7vkAVCBVHEAbEb4zuX6vI7qsLqJtN";
    const STORED_UNDER_OTHER_KEY: &str =
        "sTS06gFyj51JbZUx$wq5E0lT4MoQBxjonS+kkibtWrvgFRgfNuUjLHuyC3IZLRz9DArw=";
    const THREE_SEGMENTS: &str =
        "rvgFR$sTS06gFyj51JbZUx$wq5E0lT4MoQBxjonS+kkibtWrvgFRgfNuUjLHuyC3IZLRz9DArw=";

    #[test]
    fn decrypts_stored_value() {
        assert_eq!(encrypter().decrypt(STORED).unwrap(), "someStringWith123");
    }

    #[test]
    fn stored_value_with_edited_nonce_fails() {
        assert_eq!(
            encrypter().decrypt(STORED_NONCE_EDITED),
            Err(CryptoError::DecryptionFailed)
        );
    }

    #[test]
    fn stored_value_under_other_key_fails() {
        assert_eq!(
            encrypter().decrypt(STORED_UNDER_OTHER_KEY),
            Err(CryptoError::DecryptionFailed)
        );
    }

    #[test]
    fn three_segment_value_fails() {
        assert_eq!(
            encrypter().decrypt(THREE_SEGMENTS),
            Err(CryptoError::DecryptionFailed)
        );
    }
}
