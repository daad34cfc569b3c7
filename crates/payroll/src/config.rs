//! Configuration loading and validation for the payroll service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::keys::KeySource;
use crate::users::AdminPasswordSource;

/// Validated payroll service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to a file whose raw bytes are the salary encryption key. Absent or
    /// blank selects the embedded default key.
    #[serde(default)]
    pub encrypter_secret_file: Option<String>,

    /// Path to a file whose full contents are the admin password. Absent or
    /// blank selects the built-in development password.
    #[serde(default)]
    pub admin_password_file: Option<String>,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP endpoint for span export. Absent disables export.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Where the encryption key is resolved from.
    pub fn key_source(&self) -> KeySource {
        KeySource::from_optional_path(self.encrypter_secret_file.as_deref())
    }

    /// Where the admin password is read from.
    pub fn admin_password_source(&self) -> AdminPasswordSource {
        AdminPasswordSource::from_optional_path(self.admin_password_file.as_deref())
    }

    /// The OTLP endpoint, treating a blank value as unset.
    pub fn otlp_endpoint(&self) -> Option<&str> {
        self.otel_exporter_otlp_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn validate(&self) -> Result<()> {
        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be a non-zero port");
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn base() -> Config {
        Config {
            encrypter_secret_file: None,
            admin_password_file: None,
            listen_port: default_listen_port(),
            log_level: default_log_level(),
            otel_exporter_otlp_endpoint: None,
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let cfg = Config {
            listen_port: 0,
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_log_level() {
        let cfg = Config {
            log_level: " ".into(),
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn key_source_defaults_to_embedded() {
        assert_eq!(base().key_source(), KeySource::EmbeddedDefault);
        let cfg = Config {
            encrypter_secret_file: Some(String::new()),
            ..base()
        };
        assert_eq!(cfg.key_source(), KeySource::EmbeddedDefault);
    }

    #[test]
    fn key_source_uses_configured_file() {
        let cfg = Config {
            encrypter_secret_file: Some("/run/secrets/salary.key".into()),
            ..base()
        };
        assert_eq!(
            cfg.key_source(),
            KeySource::File(PathBuf::from("/run/secrets/salary.key"))
        );
    }

    #[test]
    fn admin_password_source_follows_configured_file() {
        assert_eq!(base().admin_password_source(), AdminPasswordSource::Default);
        let cfg = Config {
            admin_password_file: Some("/run/secrets/admin".into()),
            ..base()
        };
        assert_eq!(
            cfg.admin_password_source(),
            AdminPasswordSource::File(PathBuf::from("/run/secrets/admin"))
        );
    }

    #[test]
    fn blank_otlp_endpoint_is_unset() {
        let cfg = Config {
            otel_exporter_otlp_endpoint: Some("  ".into()),
            ..base()
        };
        assert_eq!(cfg.otlp_endpoint(), None);
        let cfg = Config {
            otel_exporter_otlp_endpoint: Some("http://collector:4317".into()),
            ..base()
        };
        assert_eq!(cfg.otlp_endpoint(), Some("http://collector:4317"));
    }
}
