//! Resolution and validation of the process-wide encryption key.
//!
//! # Lifecycle
//!
//! 1. At startup, [`resolve`] turns the configured [`KeySource`] into a
//!    [`SymmetricKey`]: the embedded default, or the raw bytes of a key file.
//! 2. [`validate`] runs an encryption self-test so that an unusable key stops
//!    the process at boot instead of failing the first request.
//! 3. The key is shared read-only behind an `Arc` for the rest of the process.
//!
//! # Security invariants
//!
//! - Key material is never logged, serialised, or compared by content.
//! - A configured key file that is missing or unreadable is fatal. There is no
//!   fallback to the default key once a file has been configured.

pub mod key;

pub use key::{KeySource, SymmetricKey};

use std::io;
use std::path::Path;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{info, warn};

use crate::crypto::cipher;
use crate::startup::StartupError;

/// Built-in 192-bit key used when no key file is configured.
const EMBEDDED_DEFAULT_KEY: &str = "rAVn/aQefln0FxbdOOp9jRWmZHksz4mZ";

/// Resolve the key named by `source`.
///
/// # Errors
///
/// Returns [`StartupError::KeyFileMissing`] or [`StartupError::KeyFileUnreadable`]
/// for an unusable key file.
pub fn resolve(source: &KeySource) -> Result<SymmetricKey, StartupError> {
    match source {
        KeySource::EmbeddedDefault => {
            warn!("no secret key file configured; using the embedded default key (not for production)");
            let bytes = STANDARD
                .decode(EMBEDDED_DEFAULT_KEY)
                .map_err(|_| StartupError::InvalidDefaultKey)?;
            Ok(SymmetricKey::from_bytes(bytes))
        }
        KeySource::File(path) => {
            let key = read_key_file(path)?;
            info!(path = %path.display(), key_bits = key.bits(), "secret key loaded from file");
            Ok(key)
        }
    }
}

fn read_key_file(path: &Path) -> Result<SymmetricKey, StartupError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(SymmetricKey::from_bytes(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StartupError::KeyFileMissing {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(StartupError::KeyFileUnreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Self-test: encrypt the empty string with `key`.
///
/// # Errors
///
/// Returns [`StartupError::SelfTestFailed`] if the key cannot drive the cipher,
/// e.g. a key file whose length is not 16, 24 or 32 bytes.
pub fn validate(key: &SymmetricKey) -> Result<(), StartupError> {
    cipher::encrypt("", key).map_err(StartupError::SelfTestFailed)?;
    info!(key_bits = key.bits(), "encryption self-test passed");
    Ok(())
}

/// [`resolve`] then [`validate`], returning the key ready for sharing.
pub fn load(source: &KeySource) -> Result<Arc<SymmetricKey>, StartupError> {
    let key = resolve(source)?;
    validate(&key)?;
    Ok(Arc::new(key))
}
