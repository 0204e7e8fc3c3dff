//! APIs for getting information about the application.

use crate::infra::state::AppState;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

/// The info API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new().route("/info", get(info))
}

/// Application information.
#[derive(Clone, Copy, Debug, Serialize, ToSchema)]
pub struct AppInfo {
    // The application name.
    name: &'static str,
    // The application version.
    version: &'static str,
}

/// Returns application information.
#[utoipa::path(
    get,
    path = "/info",
    responses(
        (status = 200, description = "Success", body = AppInfo),
    )
)]
pub async fn info() -> Json<AppInfo> {
    Json(AppInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::info;

    #[tokio::test]
    async fn info_reports_package() {
        let response = info().await;
        assert_eq!("hello-server", response.0.name);
        assert_eq!(env!("CARGO_PKG_VERSION"), response.0.version);
    }
}
