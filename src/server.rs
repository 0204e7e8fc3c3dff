//! REST API implementation.
//!
//! # Examples
//!
//! Hello API.
//!
//! ```rust
//! # use hello_server::infra::config::{Config, UserCredentials};
//! # tokio_test::block_on(async {
//! # let mut config = Config::default();
//! # config.security.users.push(UserCredentials::new("Bob", bcrypt::hash("bob", 4).unwrap()));
//! let url = hello_server::server::spawn_app(config).await.unwrap();
//! let client = reqwest::Client::new();
//! let response = client
//!     .get(format!("{url}/hello"))
//!     .basic_auth("Bob", Some("bob"))
//!     .send()
//!     .await
//!     .unwrap();
//! assert_eq!(200, response.status());
//! assert_eq!("Hello, Bob!", response.text().await.unwrap());
//! # });
//! ```

use crate::feature::{hello::hello_api, info::info_api};
use crate::infra::{
    config::Config,
    error::{ApiError, ClientError, InternalError, PanicHandler},
    middleware::{auth_challenge, MakeRequestIdSpan},
    openapi::ApiDoc,
    shutdown::shutdown_signal,
    state::AppState,
};
use axum::{
    error_handling::HandleErrorLayer, response::Redirect, routing::get, BoxError, Router,
};
use http::{header::AUTHORIZATION, StatusCode};
use std::iter::once;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Constructs the full REST API including middleware.
pub fn rest_api(state: AppState) -> Router {
    let realm = state.config().security.realm.clone();
    let server = &state.config().server;

    // Fallible middleware from tower, mapped to infallible response with [`HandleErrorLayer`].
    let tower_middleware = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .concurrency_limit(server.concurrency_limit)
        .timeout(server.request_timeout);

    // Our API
    Router::new()
        .merge(info_api::routes())
        .merge(hello_api::routes())
        .with_state(state)
        // Layers
        .layer(axum::middleware::map_response_with_state(
            realm,
            auth_challenge,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(MakeRequestIdSpan)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(()),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(SetSensitiveRequestHeadersLayer::new(once(AUTHORIZATION)))
        .layer(tower_middleware)
        .layer(CatchPanicLayer::custom(PanicHandler))
}

async fn handle_middleware_error(e: BoxError) -> ApiError {
    if e.is::<tower::timeout::error::Elapsed>() {
        ClientError::Custom(StatusCode::REQUEST_TIMEOUT, "request timed out".to_string()).into()
    } else {
        InternalError::Other(format!("Tower middleware failed: {e}")).into()
    }
}

/// Constructs the full axum application.
pub fn app(state: AppState) -> Router {
    // The full application with some top level routes and the REST API.
    let swagger_path = "/swagger-ui";
    Router::new()
        .route("/", get(move || async move { Redirect::permanent(swagger_path) }))
        // API specification
        .merge(SwaggerUi::new(swagger_path).url("/api.json", ApiDoc::openapi()))
        // API
        .merge(rest_api(state))
        .fallback(|| async { ClientError::NotFound })
}

/// Starts the axum server.
pub async fn run_app(listener: TcpListener, config: Config) -> std::io::Result<()> {
    let state = AppState::new(config);
    let app = app(state);

    tracing::info!("Starting axum on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Spawn a server on a random port, returning its base url.
pub async fn spawn_app(config: Config) -> std::io::Result<String> {
    let address = "127.0.0.1";
    let listener = TcpListener::bind(format!("{address}:0")).await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(run_app(listener, config));
    Ok(format!("http://{address}:{port}"))
}
