//! Axum router construction.

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
///
/// `/api` routes require HTTP Basic credentials; `/health` and the fallback do
/// not.
pub fn build(state: AppState) -> Router {
    let employees = Router::new()
        .route("/get", get(handlers::list_employees))
        .route("/get/:employee_id", get(handlers::get_employee))
        .route("/add", post(handlers::add_employee))
        .route("/delete/:employee_id", delete(handlers::delete_employee))
        .route("/update", put(handlers::update_employee))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::employees_guard,
        ));

    let users = Router::new()
        .route("/get", get(handlers::list_users))
        .route("/get/:user_id", get(handlers::get_user))
        .route("/add", post(handlers::add_user))
        .route("/delete/:user_id", delete(handlers::delete_user))
        .route_layer(from_fn_with_state(state.clone(), middleware::users_guard));

    Router::new()
        .nest("/api/v1/employees", employees)
        .nest("/api/v1/users", users)
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .with_state(state)
}
