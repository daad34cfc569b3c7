//! Errors that stop the process before it binds the listener.

use std::io;
use std::path::PathBuf;

use common::ServiceError;
use thiserror::Error;

use crate::crypto::CryptoError;
use crate::users::password::PasswordError;

/// Errors that must stop the process before it serves traffic.
///
/// Never reaches the transport layer; `main` logs it and exits non-zero.
#[derive(Debug, Error)]
pub enum StartupError {
    /// A key file is configured but does not exist.
    #[error("no external secret key file found in: {}", .path.display())]
    KeyFileMissing { path: PathBuf },

    /// A key file exists but could not be read.
    #[error("failed to read secret key file {}", .path.display())]
    KeyFileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The embedded default key failed to decode.
    #[error("embedded default key is not valid base64")]
    InvalidDefaultKey,

    /// Encrypting the empty string with the resolved key failed.
    #[error("encryption self-test failed")]
    SelfTestFailed(#[source] CryptoError),

    /// An admin password file is configured but does not exist.
    #[error("no admin password file found in: {}", .path.display())]
    AdminPasswordFileMissing { path: PathBuf },

    /// An admin password file exists but is not readable UTF-8 text.
    #[error("failed to read admin password file {}", .path.display())]
    AdminPasswordFileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The password hasher could not be built from its parameters.
    #[error("password hasher misconfigured")]
    PasswordHasher(#[source] PasswordError),

    /// The admin account could not be created.
    #[error("failed to create the admin user")]
    AdminSeedFailed(#[source] ServiceError),
}
