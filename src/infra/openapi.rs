//! OpenAPI configuration.

use crate::feature::{hello::hello_api, info::info_api};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

/// OpenApi configuration.
#[derive(OpenApi)]
#[openapi(
    paths(
        info_api::info,
        hello_api::hello,
    ),
    components(
        schemas(
            info_api::AppInfo,
            crate::infra::error::ErrorBody
        )
    ),
    modifiers(&SecurityAddon)
)]
#[derive(Clone, Copy, Debug)]
pub struct ApiDoc;

/// Security settings
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            )
        }
    }
}
