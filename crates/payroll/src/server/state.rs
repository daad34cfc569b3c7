//! Shared application state injected into every Axum handler.

use crate::employees::EmployeeService;
use crate::users::UserService;

/// Application state shared across all request handlers.
///
/// Cheap to clone: both services hold only `Arc`-backed handles, so Axum can
/// clone the state for each request without copying the key or the tables.
#[derive(Clone)]
pub struct AppState {
    pub employees: EmployeeService,
    pub users: UserService,
}

impl AppState {
    pub fn new(employees: EmployeeService, users: UserService) -> Self {
        Self { employees, users }
    }
}
