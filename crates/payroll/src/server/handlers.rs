//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{Employee, EmployeeAddRequest, ErrorResponse, HealthResponse, UserAddRequest};
use common::ServiceError;
use tracing::{debug, warn};

use super::extract::{ApiJson, ApiPath};
use super::state::AppState;

/// `GET /api/v1/employees/get`: every employee with its salary decrypted.
pub async fn list_employees(State(state): State<AppState>) -> Response {
    match state.employees.retrieve_employees().await {
        Ok(all) => (StatusCode::OK, Json(all)).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /api/v1/employees/get/:employee_id`
pub async fn get_employee(
    State(state): State<AppState>,
    ApiPath(employee_id): ApiPath<i64>,
) -> Response {
    match state.employees.get_employee(employee_id).await {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /api/v1/employees/add`: responds with the new employee id.
pub async fn add_employee(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EmployeeAddRequest>,
) -> Response {
    match state.employees.save_employee(req).await {
        Ok(id) => (StatusCode::OK, Json(id)).into_response(),
        Err(e) => error_response(e),
    }
}

/// `DELETE /api/v1/employees/delete/:employee_id`
pub async fn delete_employee(
    State(state): State<AppState>,
    ApiPath(employee_id): ApiPath<i64>,
) -> Response {
    match state.employees.delete_employee(employee_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => error_response(e),
    }
}

/// `PUT /api/v1/employees/update`
pub async fn update_employee(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<Employee>,
) -> Response {
    match state.employees.update_employee(req).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /api/v1/users/get`: every user, without password hashes.
pub async fn list_users(State(state): State<AppState>) -> Response {
    (StatusCode::OK, Json(state.users.retrieve_users().await)).into_response()
}

/// `GET /api/v1/users/get/:user_id`
pub async fn get_user(State(state): State<AppState>, ApiPath(user_id): ApiPath<i64>) -> Response {
    match state.users.get_user(user_id).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /api/v1/users/add`: responds with the new user id.
pub async fn add_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserAddRequest>,
) -> Response {
    match state.users.save_user(req).await {
        Ok(id) => (StatusCode::OK, Json(id)).into_response(),
        Err(e) => error_response(e),
    }
}

/// `DELETE /api/v1/users/delete/:user_id`
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> Response {
    match state.users.delete_user(user_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /health`: liveness and readiness check.
///
/// Returns `200 OK` when the encryption self-test passes against the live key,
/// `503 Service Unavailable` otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let key_ready = state.employees.key_ready();
    let employees = state.employees.store().len().await;

    let (status_code, status_str) = if key_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        key_ready,
        employees,
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Render a [`ServiceError`] as its status code and a `{code, message}` body.
///
/// The body carries only the reason's fixed message; cipher detail never
/// leaves the process.
pub(crate) fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match err {
        ServiceError::Internal(reason) => warn!(?reason, "request failed with internal error"),
        ServiceError::BadRequest(reason)
        | ServiceError::Unauthorized(reason)
        | ServiceError::Forbidden(reason)
        | ServiceError::NotFound(reason) => {
            debug!(?reason, status = status.as_u16(), "request rejected")
        }
    }
    (status, Json(ErrorResponse::from(&err))).into_response()
}
