//! Telemetry setup: structured logs, with optional OTLP span export.
//!
//! # Telemetry invariants
//!
//! - **No salaries or key material** may appear in any span attribute or log
//!   field. Employee ids and key lengths are fine.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   overrides it.

pub mod init;

pub use init::init_telemetry;
