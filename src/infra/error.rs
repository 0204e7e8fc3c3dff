//! Types for reporting errors that happened during a request.
//!
//! If your function can fail in a way the client should hear about,
//! you likely want to return a [`ApiResult`].

use axum::{http::HeaderValue, response::IntoResponse, Json};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tower_http::catch_panic::ResponseForPanic;
use utoipa::ToSchema;

/// A standard error response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// A description of the error.
    message: String,
    /// When the error happened.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    timestamp: OffsetDateTime,
}

impl ErrorBody {
    pub(crate) fn new(message: String) -> Self {
        Self {
            message,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// When the error happened.
    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }
}

/// An error from our API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An error caused by the client.
    #[error("{0}")]
    ClientError(#[from] ClientError),
    /// An internal error.
    #[error("{0}")]
    InternalError(#[from] InternalError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::ClientError(e) => e.into_response(),
            ApiError::InternalError(e) => {
                tracing::error!("internal error: {}", e);
                e.into_response()
            }
        }
    }
}

/// The result of calling API-related functions.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<bcrypt::BcryptError> for ApiError {
    fn from(e: bcrypt::BcryptError) -> Self {
        ApiError::InternalError(InternalError::BcryptError(e))
    }
}

/// Errors caused by the client.
/// The client can do something to fix these.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing or bad credentials.
    #[error("unauthorized")]
    Unauthorized,
    /// The resource was not found.
    #[error("not found")]
    NotFound,
    /// Custom error.
    #[error("{1}")]
    Custom(StatusCode, String),
}

impl IntoResponse for ClientError {
    fn into_response(self) -> axum::response::Response {
        let msg = self.to_string();
        let status = match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Custom(status, _) => status,
        };
        (status, Json(ErrorBody::new(msg))).into_response()
    }
}

/// An internal error.
/// The client cannot do anything about this.
#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    /// Bcrypt failed to perform some operation.
    #[error("bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
    /// A blocking task panicked or was cancelled.
    #[error("join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
    /// Other miscellaneous errors.
    #[error("{0}")]
    Other(String),
}

impl IntoResponse for InternalError {
    fn into_response(self) -> axum::response::Response {
        let mut response = (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("internal error".to_string())),
        )
            .into_response();
        response
            .headers_mut()
            .insert("Retry-After", HeaderValue::from_static("5"));
        response
    }
}

/// A handler for converting panics into proper responses for the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanicHandler;

impl ResponseForPanic for PanicHandler {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(
        &mut self,
        _: Box<dyn std::any::Any + Send + 'static>,
    ) -> http::Response<Self::ResponseBody> {
        ApiError::InternalError(InternalError::Other("Panic".to_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_401() {
        let response = ApiError::from(ClientError::Unauthorized).into_response();
        assert_eq!(StatusCode::UNAUTHORIZED, response.status());
    }

    #[test]
    fn custom_keeps_its_status() {
        let response =
            ClientError::Custom(StatusCode::REQUEST_TIMEOUT, "timed out".to_string())
                .into_response();
        assert_eq!(StatusCode::REQUEST_TIMEOUT, response.status());
    }

    #[test]
    fn internal_errors_ask_client_to_retry() {
        let response = ApiError::from(InternalError::Other("boom".to_string())).into_response();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
        assert_eq!("5", response.headers()["Retry-After"]);
    }

    #[test]
    fn panics_become_internal_errors() {
        let response = PanicHandler.response_for_panic(Box::new("oops"));
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
    }
}
