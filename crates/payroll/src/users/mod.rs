//! User accounts, roles, and the admin account created at startup.
//!
//! Passwords are stored only as Argon2id hashes. The admin password comes from
//! an optional file; a configured file that is missing stops the process the
//! same way a missing key file does.

pub mod password;
pub mod service;
pub mod store;

pub use password::PasswordEncoder;
pub use service::UserService;
pub use store::UserStore;

use std::io;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::startup::StartupError;

/// Admin password used when no password file is configured.
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Where the admin password comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminPasswordSource {
    /// The built-in development password.
    Default,
    /// The full contents of this file, used verbatim.
    File(PathBuf),
}

impl AdminPasswordSource {
    /// Map an optional configured path to a source; blank means the default.
    pub fn from_optional_path(path: Option<&str>) -> Self {
        match path {
            Some(p) if !p.trim().is_empty() => AdminPasswordSource::File(PathBuf::from(p)),
            _ => AdminPasswordSource::Default,
        }
    }
}

/// Read the admin password named by `source`.
///
/// # Errors
///
/// [`StartupError::AdminPasswordFileMissing`] or
/// [`StartupError::AdminPasswordFileUnreadable`] for an unusable file.
pub fn resolve_admin_password(source: &AdminPasswordSource) -> Result<String, StartupError> {
    match source {
        AdminPasswordSource::Default => {
            warn!("no admin password file configured; using the default admin password (not for production)");
            Ok(DEFAULT_ADMIN_PASSWORD.to_owned())
        }
        AdminPasswordSource::File(path) => match std::fs::read_to_string(path) {
            Ok(password) => {
                info!(path = %path.display(), "admin password loaded from file");
                Ok(password)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StartupError::AdminPasswordFileMissing { path: path.clone() })
            }
            Err(source) => Err(StartupError::AdminPasswordFileUnreadable {
                path: path.clone(),
                source,
            }),
        },
    }
}

/// Resolve the admin password and create the admin account.
pub async fn seed_admin(
    users: &UserService,
    source: &AdminPasswordSource,
) -> Result<(), StartupError> {
    let password = resolve_admin_password(source)?;
    users
        .ensure_admin(&password)
        .await
        .map_err(StartupError::AdminSeedFailed)
}
