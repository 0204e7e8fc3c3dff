//! Middleware for modifying requests and responses.

use axum::{extract::State, response::Response};
use http::{header::WWW_AUTHENTICATE, HeaderValue, Request, StatusCode};
use tower_http::trace::MakeSpan;

static X_REQUEST_ID: &str = "x-request-id";

#[derive(Clone)]
pub(crate) struct MakeRequestIdSpan;

impl<B> MakeSpan<B> for MakeRequestIdSpan {
    fn make_span(&mut self, request: &Request<B>) -> tracing::Span {
        let request_id = request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|id| id.to_str().ok())
            .unwrap_or("unknown");
        tracing::info_span!(
            "request",
            request_id = request_id,
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
        )
    }
}

/// Tells clients that were turned away how to authenticate.
pub(crate) async fn auth_challenge(State(realm): State<String>, mut res: Response) -> Response {
    if res.status() == StatusCode::UNAUTHORIZED {
        match HeaderValue::from_str(&format!("Basic realm=\"{realm}\"")) {
            Ok(challenge) => {
                res.headers_mut().insert(WWW_AUTHENTICATE, challenge);
            }
            Err(e) => tracing::warn!("Invalid realm {:?}: {}", realm, e),
        }
    }
    res
}
