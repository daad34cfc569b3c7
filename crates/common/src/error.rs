//! Error taxonomy shared across crates.
//!
//! Every failure surfaced to a caller names one [`ErrorReason`]. The reason fixes
//! both the human-readable message and the [`Severity`], and the severity decides
//! which [`ServiceError`] variant carries it to the transport layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who is responsible for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The caller sent invalid input; resubmitting corrected input fixes it.
    Client,
    /// A lookup missed.
    NotFound,
    /// The request carried no valid credentials.
    Unauthenticated,
    /// The caller is authenticated but its role does not grant the operation.
    Forbidden,
    /// The service broke one of its own invariants (crypto, stored data).
    Server,
}

/// Closed set of named failure reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorReason {
    UserIdNegative,
    UserUsernameEmpty,
    UserPasswordEmpty,
    UserRoleEmpty,
    GetUserNotFound,
    UserUsernameExist,
    UserDeleteAdmin,
    AuthenticationRequired,
    AccessDenied,
    EmployeeIdNegative,
    EmployeeNameEmpty,
    EmployeeDeptEmpty,
    EmployeeSalaryNegative,
    UpdateEmployeeNotFound,
    GetEmployeeNotFound,
    EncryptionFailed,
    DecryptionFailed,
    CorruptedRecord,
    PasswordHashFailed,
}

impl ErrorReason {
    /// Every reason, in declaration order.
    pub const ALL: [ErrorReason; 19] = [
        ErrorReason::UserIdNegative,
        ErrorReason::UserUsernameEmpty,
        ErrorReason::UserPasswordEmpty,
        ErrorReason::UserRoleEmpty,
        ErrorReason::GetUserNotFound,
        ErrorReason::UserUsernameExist,
        ErrorReason::UserDeleteAdmin,
        ErrorReason::AuthenticationRequired,
        ErrorReason::AccessDenied,
        ErrorReason::EmployeeIdNegative,
        ErrorReason::EmployeeNameEmpty,
        ErrorReason::EmployeeDeptEmpty,
        ErrorReason::EmployeeSalaryNegative,
        ErrorReason::UpdateEmployeeNotFound,
        ErrorReason::GetEmployeeNotFound,
        ErrorReason::EncryptionFailed,
        ErrorReason::DecryptionFailed,
        ErrorReason::CorruptedRecord,
        ErrorReason::PasswordHashFailed,
    ];

    /// Fixed message safe to expose to callers.
    pub fn message(self) -> &'static str {
        match self {
            ErrorReason::UserIdNegative => "User id should be a positive number",
            ErrorReason::UserUsernameEmpty => "User username should not be empty",
            ErrorReason::UserPasswordEmpty => "User password should not be empty",
            ErrorReason::UserRoleEmpty => "User role should not be empty",
            ErrorReason::GetUserNotFound => "User with requested id does not exist",
            ErrorReason::UserUsernameExist => "User with provided username already exist",
            ErrorReason::UserDeleteAdmin => "Could not delete admin user",
            ErrorReason::AuthenticationRequired => {
                "Full authentication is required to access this resource"
            }
            ErrorReason::AccessDenied => "Access is denied",
            ErrorReason::EmployeeIdNegative => "Employee id should be a positive number",
            ErrorReason::EmployeeNameEmpty => "Employee name should not be empty",
            ErrorReason::EmployeeDeptEmpty => "Employee department should not be empty",
            ErrorReason::EmployeeSalaryNegative => "Employee salary should be a positive number",
            ErrorReason::UpdateEmployeeNotFound => "Updated employee does not exist",
            ErrorReason::GetEmployeeNotFound => "Employee with requested id does not exist",
            ErrorReason::EncryptionFailed => "Unable to encrypt data",
            ErrorReason::DecryptionFailed => "Unable to decrypt data",
            ErrorReason::CorruptedRecord => "Stored employee record is corrupted",
            ErrorReason::PasswordHashFailed => "Unable to hash password",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ErrorReason::UserIdNegative
            | ErrorReason::UserUsernameEmpty
            | ErrorReason::UserPasswordEmpty
            | ErrorReason::UserRoleEmpty
            | ErrorReason::UserUsernameExist
            | ErrorReason::UserDeleteAdmin
            | ErrorReason::EmployeeIdNegative
            | ErrorReason::EmployeeNameEmpty
            | ErrorReason::EmployeeDeptEmpty
            | ErrorReason::EmployeeSalaryNegative => Severity::Client,
            ErrorReason::GetUserNotFound
            | ErrorReason::UpdateEmployeeNotFound
            | ErrorReason::GetEmployeeNotFound => Severity::NotFound,
            ErrorReason::AuthenticationRequired => Severity::Unauthenticated,
            ErrorReason::AccessDenied => Severity::Forbidden,
            ErrorReason::EncryptionFailed
            | ErrorReason::DecryptionFailed
            | ErrorReason::CorruptedRecord
            | ErrorReason::PasswordHashFailed => Severity::Server,
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::Unauthorized`] → 401
/// - [`ServiceError::Forbidden`] → 403
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The request failed a precondition check.
    #[error("bad request: {0}")]
    BadRequest(ErrorReason),

    /// Credentials are missing or do not match a user.
    #[error("unauthorized: {0}")]
    Unauthorized(ErrorReason),

    /// The authenticated user's role does not permit the request.
    #[error("forbidden: {0}")]
    Forbidden(ErrorReason),

    /// The addressed record does not exist.
    #[error("not found: {0}")]
    NotFound(ErrorReason),

    /// Encryption, decryption, or stored data failed an internal invariant.
    #[error("internal error: {0}")]
    Internal(ErrorReason),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Unauthorized(_) => 401,
            ServiceError::Forbidden(_) => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Unauthorized(_) => "unauthorized",
            ServiceError::Forbidden(_) => "forbidden",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Internal(_) => "internal_error",
        }
    }

    pub fn reason(&self) -> ErrorReason {
        match self {
            ServiceError::BadRequest(r)
            | ServiceError::Unauthorized(r)
            | ServiceError::Forbidden(r)
            | ServiceError::NotFound(r)
            | ServiceError::Internal(r) => *r,
        }
    }
}

impl From<ErrorReason> for ServiceError {
    fn from(reason: ErrorReason) -> Self {
        match reason.severity() {
            Severity::Client => ServiceError::BadRequest(reason),
            Severity::NotFound => ServiceError::NotFound(reason),
            Severity::Unauthenticated => ServiceError::Unauthorized(reason),
            Severity::Forbidden => ServiceError::Forbidden(reason),
            Severity::Server => ServiceError::Internal(reason),
        }
    }
}
