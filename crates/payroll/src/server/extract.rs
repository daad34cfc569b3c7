//! Extractors whose rejections use the standard `{code, message}` error body.
//!
//! Axum's own `Json` and `Path` reject with plain-text bodies and, for JSON that
//! parses but does not fit the target type, a 422. Every undecodable request is
//! reported here as a 400 `bad_request` instead.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Request,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::ErrorResponse;
use serde::de::DeserializeOwned;
use tracing::debug;

/// A request body or path segment that could not be decoded.
#[derive(Debug)]
pub struct RequestRejection {
    message: String,
}

impl IntoResponse for RequestRejection {
    fn into_response(self) -> Response {
        debug!(message = %self.message, "request could not be decoded");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("bad_request", self.message)),
        )
            .into_response()
    }
}

impl From<JsonRejection> for RequestRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for RequestRejection {
    fn from(rejection: PathRejection) -> Self {
        Self {
            message: rejection.body_text(),
        }
    }
}

/// JSON request body.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RequestRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Typed path parameters.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = RequestRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}
