//! [`SymmetricKey`] and the configured [`KeySource`] it is resolved from.

use std::fmt;
use std::path::PathBuf;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// The process-wide symmetric key.
///
/// Immutable once resolved. The bytes are zeroed on drop, redacted in `Debug`,
/// and deliberately not comparable: there is no `PartialEq`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey(Vec<u8>);

impl SymmetricKey {
    /// Wrap raw key material. No length check happens here; an unusable length
    /// is caught by the encryption self-test.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bits, safe to log.
    pub fn bits(&self) -> usize {
        self.0.len() * 8
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material is never printed, in any build.
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// Where the key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// The key compiled into the binary. Insecure outside development: anyone
    /// holding the binary can decrypt every stored salary.
    EmbeddedDefault,
    /// Raw key bytes read from this file.
    File(PathBuf),
}

impl KeySource {
    /// Map an optional configured path to a source; blank means the default.
    ///
    /// A non-blank path is used exactly as configured.
    pub fn from_optional_path(path: Option<&str>) -> Self {
        match path {
            Some(p) if !p.trim().is_empty() => KeySource::File(PathBuf::from(p)),
            _ => KeySource::EmbeddedDefault,
        }
    }
}
