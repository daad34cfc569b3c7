//! Precondition checks applied to request input before it reaches the codec or
//! the repository.
//!
//! Checks compose with `?`, so the first failing check in a sequence is the one
//! reported.

use thiserror::Error;

use crate::error::{ErrorReason, ServiceError};

/// A failed precondition. Carries only the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ValidationError {
    pub reason: ErrorReason,
}

impl ValidationError {
    pub fn new(reason: ErrorReason) -> Self {
        Self { reason }
    }
}

/// The variant follows the reason's severity, so a validation failure that
/// names a server reason is never reported as a client error.
impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::from(err.reason)
    }
}

/// Fails with `reason` when `value` is absent.
pub fn require_not_null<T>(value: Option<T>, reason: ErrorReason) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::new(reason))
}

/// Fails with `reason` when `value` is absent or the empty string.
pub fn require_non_empty(value: Option<&str>, reason: ErrorReason) -> Result<&str, ValidationError> {
    match value {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ValidationError::new(reason)),
    }
}

/// Fails with `reason` when `value` is absent or not strictly positive.
///
/// Accepts any integer type that widens losslessly into `i64` (`i32` and `i64`
/// in practice).
pub fn require_positive<N>(value: Option<N>, reason: ErrorReason) -> Result<N, ValidationError>
where
    N: Copy + Into<i64>,
{
    match value {
        Some(n) if n.into() > 0 => Ok(n),
        _ => Err(ValidationError::new(reason)),
    }
}
