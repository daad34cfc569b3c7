//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, response compression, and
//! HTTP Basic authentication with role checks for the `/api` routes.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        HeaderMap, HeaderValue, Method,
    },
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::protocol::Role;
use common::{ErrorReason, ServiceError};
use tracing::debug;

use super::handlers::error_response;
use super::state::AppState;

/// Per-request timeout applied to all routes.
///
/// Password verification dominates request cost; this also bounds a stalled
/// client body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const BASIC_CHALLENGE: &str = "Basic realm=\"payroll\"";

/// What a request needs its caller's role to allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadEmployees,
    WriteEmployees,
    ManageUsers,
}

impl Access {
    /// `GET` reads employees; every other method writes them.
    pub fn for_employee_request(method: &Method) -> Self {
        if method == Method::GET || method == Method::HEAD {
            Access::ReadEmployees
        } else {
            Access::WriteEmployees
        }
    }

    pub fn permits(self, role: Role) -> bool {
        match self {
            Access::ReadEmployees => true,
            Access::WriteEmployees => matches!(role, Role::Editor | Role::Administrator),
            Access::ManageUsers => role == Role::Administrator,
        }
    }
}

/// Guard for `/api/v1/employees`: any role reads, editors and administrators write.
pub async fn employees_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let access = Access::for_employee_request(request.method());
    authorize(&state, access, request, next).await
}

/// Guard for `/api/v1/users`: administrators only.
pub async fn users_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    authorize(&state, Access::ManageUsers, request, next).await
}

async fn authorize(state: &AppState, access: Access, request: Request, next: Next) -> Response {
    let Some((username, password)) = basic_credentials(request.headers()) else {
        return unauthorized();
    };
    let Some(role) = state.users.authenticate(&username, &password).await else {
        debug!(username = %username, "authentication failed");
        return unauthorized();
    };
    if !access.permits(role) {
        debug!(username = %username, ?role, ?access, "access denied");
        return error_response(ServiceError::Forbidden(ErrorReason::AccessDenied));
    }
    next.run(request).await
}

fn unauthorized() -> Response {
    let mut response = error_response(ServiceError::Unauthorized(
        ErrorReason::AuthenticationRequired,
    ));
    response
        .headers_mut()
        .insert(WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_CHALLENGE));
    response
}

/// Decode `Authorization: Basic base64(username:password)`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_owned(), password.to_owned()))
}
