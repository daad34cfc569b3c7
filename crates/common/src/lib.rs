//! Common types, protocol definitions, errors, and input validation shared across
//! `payroll-vault` crates.

pub mod error;
pub mod protocol;
pub mod validation;

pub use error::{ErrorReason, ServiceError, Severity};
pub use validation::ValidationError;
