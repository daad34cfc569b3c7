//! Argon2id password hashing.

use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

// OWASP recommended Argon2id settings.
pub const SALT_LEN: usize = 16;
pub const HASH_LEN: usize = 32;
pub const PARALLELISM: u32 = 1;
/// Memory cost in KiB (12 MiB).
pub const MEMORY_KIB: u32 = 12_288;
pub const ITERATIONS: u32 = 3;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid argon2 parameters: {0}")]
    Params(argon2::Error),

    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Hashes passwords into PHC strings and checks candidates against them.
///
/// Each hash embeds its own salt and parameters, so verification keeps working
/// for hashes written under different settings.
#[derive(Clone)]
pub struct PasswordEncoder {
    argon2: Argon2<'static>,
}

impl PasswordEncoder {
    /// Encoder with explicit cost parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::Params`] if argon2 rejects the combination.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, Some(HASH_LEN))
            .map_err(PasswordError::Params)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Encoder with the OWASP recommended parameters.
    pub fn owasp() -> Result<Self, PasswordError> {
        Self::new(MEMORY_KIB, ITERATIONS, PARALLELISM)
    }

    /// Hash `password` with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::Hash`] if argon2 fails.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let salt = SaltString::encode_b64(&salt).map_err(PasswordError::Hash)?;
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(PasswordError::Hash)?;
        Ok(hash.to_string())
    }

    /// `true` when `password` matches `hash`. A malformed hash never matches.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl std::fmt::Debug for PasswordEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordEncoder").finish_non_exhaustive()
    }
}

#[cfg(test)]
impl PasswordEncoder {
    /// Low-cost encoder so tests do not pay the production memory cost.
    pub fn fast() -> Self {
        Self::new(256, 1, 1).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let enc = PasswordEncoder::fast();
        let hash = enc.hash("5CwTbz_Ag$Z!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(enc.verify("5CwTbz_Ag$Z!", &hash));
        assert!(!enc.verify("5CwTbz_Ag$Z?", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let enc = PasswordEncoder::fast();
        assert_ne!(enc.hash("admin").unwrap(), enc.hash("admin").unwrap());
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!PasswordEncoder::fast().verify("admin", "not-a-phc-string"));
    }

    #[test]
    fn owasp_parameters_are_encoded_in_hash() {
        let hash = PasswordEncoder::owasp().unwrap().hash("admin").unwrap();
        assert!(hash.contains("m=12288,t=3,p=1"), "{hash}");
    }

    #[test]
    fn verification_uses_parameters_from_the_hash() {
        let hash = PasswordEncoder::fast().hash("admin").unwrap();
        assert!(PasswordEncoder::owasp().unwrap().verify("admin", &hash));
    }

    #[test]
    fn zero_iterations_are_rejected() {
        assert!(matches!(
            PasswordEncoder::new(MEMORY_KIB, 0, PARALLELISM),
            Err(PasswordError::Params(_))
        ));
    }
}
