//! Request and response types exchanged over the public HTTP API.
//!
//! Every request field is optional on the wire so that a missing field reaches
//! validation and is reported with its own reason instead of a generic JSON
//! rejection.

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

// ---------------------------------------------------------------------------
// Employee endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /api/v1/employees/add`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeAddRequest {
    /// Employee full name.
    pub name: Option<String>,
    /// Salary in yen.
    pub salary: Option<i32>,
    pub department: Option<String>,
}

/// Full employee record, used both as the read response and as the body of
/// `PUT /api/v1/employees/update`.
///
/// The salary is always plaintext here; it is encrypted only at rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub salary: Option<i32>,
    pub department: Option<String>,
}

// ---------------------------------------------------------------------------
// User endpoints
// ---------------------------------------------------------------------------

/// Access level granted to a user.
///
/// `Viewer` reads employees, `Editor` also writes them, and `Administrator`
/// additionally manages users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Viewer,
    Editor,
    Administrator,
}

/// Request body for `POST /api/v1/users/add`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAddRequest {
    pub username: Option<String>,
    /// Plaintext password; only its hash is stored.
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// A user as returned by the read endpoints. The password hash never leaves
/// the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        Self::new(err.code(), err.reason().message())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Whether the encryption key passed its self-test.
    pub key_ready: bool,
    /// Number of employee records currently stored.
    pub employees: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorReason;

    #[test]
    fn add_request_accepts_missing_fields() {
        let req: EmployeeAddRequest = serde_json::from_str(r#"{"name":"Johnny English"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Johnny English"));
        assert_eq!(req.salary, None);
        assert_eq!(req.department, None);
    }

    #[test]
    fn employee_serialises_plain_salary() {
        let e = Employee {
            id: Some(1),
            name: Some("Johnny English".into()),
            salary: Some(7_007_007),
            department: Some("Spy department".into()),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["salary"], 7_007_007);
        assert!(json.get("salary_encrypted").is_none());
    }

    #[test]
    fn role_uses_upper_case_names() {
        assert_eq!(serde_json::to_value(Role::Administrator).unwrap(), "ADMINISTRATOR");
        let req: UserAddRequest =
            serde_json::from_str(r#"{"username":"john.vick","password":"pw","role":"VIEWER"}"#)
                .unwrap();
        assert_eq!(req.role, Some(Role::Viewer));
        assert!(serde_json::from_str::<UserAddRequest>(r#"{"role":"viewer"}"#).is_err());
    }

    #[test]
    fn user_add_request_accepts_null_role() {
        let req: UserAddRequest =
            serde_json::from_str(r#"{"username":"john.vick","password":"pw","role":null}"#)
                .unwrap();
        assert_eq!(req.role, None);
    }

    #[test]
    fn user_response_has_no_password_field() {
        let json = serde_json::to_value(User {
            id: 1,
            username: "admin".into(),
            role: Role::Administrator,
        })
        .unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn error_response_from_service_error() {
        let e = ErrorResponse::from(&ServiceError::Internal(ErrorReason::DecryptionFailed));
        assert_eq!(e.code, "internal_error");
        assert_eq!(e.message, "Unable to decrypt data");
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            key_ready: true,
            employees: 3,
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.employees, 3);
        assert!(decoded.key_ready);
    }
}
