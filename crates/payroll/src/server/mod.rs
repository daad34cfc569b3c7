//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with the employee and user routes and shared
//!   middleware.
//! - Authenticate `/api` requests with HTTP Basic credentials and check roles.
//! - Translate [`common::ServiceError`] and extractor rejections into status
//!   codes and JSON bodies.
//! - Inject shared application state (`AppState`) into handlers.

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
