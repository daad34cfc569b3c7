//! `payroll`: payroll service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise telemetry (structured logs, optional OTLP export).
//! 3. Resolve the salary encryption key from the configured [`keys::KeySource`].
//! 4. Validate the key with an encryption self-test.
//! 5. Build the employee store, encrypter, and service.
//! 6. Build the user service and create the admin account.
//! 7. Build the Axum router and start the HTTP server.
//!
//! A failure in steps 3–6 exits before the listener is bound.

mod config;
mod crypto;
mod employees;
mod keys;
mod server;
mod startup;
mod telemetry;
mod users;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use config::Config;
use crypto::AesGcmEncrypter;
use employees::{EmployeeService, EmployeeStore};
use server::state::AppState;
use startup::StartupError;
use users::{PasswordEncoder, UserService, UserStore};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otlp_endpoint(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "payroll-vault starting"
    );

    // -----------------------------------------------------------------------
    // 3–4. Key resolution and self-test
    // -----------------------------------------------------------------------
    let key = keys::load(&cfg.key_source())
        .map_err(|e| {
            error!(error = %e, "encryption key unusable; refusing to start");
            e
        })
        .context("encryption key initialisation failed")?;

    // -----------------------------------------------------------------------
    // 5. Employee service
    // -----------------------------------------------------------------------
    let encrypter = Arc::new(AesGcmEncrypter::new(key));
    let service = EmployeeService::new(EmployeeStore::new(), encrypter);

    // -----------------------------------------------------------------------
    // 6. Users and the admin account
    // -----------------------------------------------------------------------
    let encoder = PasswordEncoder::owasp()
        .map_err(StartupError::PasswordHasher)
        .context("password hasher initialisation failed")?;
    let user_service = UserService::new(UserStore::new(), encoder);
    users::seed_admin(&user_service, &cfg.admin_password_source())
        .await
        .map_err(|e| {
            error!(error = %e, "admin user unavailable; refusing to start");
            e
        })
        .context("admin user initialisation failed")?;

    // -----------------------------------------------------------------------
    // 7. HTTP server
    // -----------------------------------------------------------------------
    let router = server::router::build(AppState::new(service, user_service));

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
