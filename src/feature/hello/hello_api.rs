//! Implementation of the hello API. An API that greets the authenticated caller.

use crate::{
    core::{greeting::greeting_service, identity::CallerIdentity},
    infra::{security::User, state::AppState},
};
use axum::{routing::get, Router};
use tracing::instrument;

/// The hello API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new().route("/hello", get(hello))
}

/// Greets the authenticated caller by name.
#[utoipa::path(
    get,
    path = "/hello",
    responses(
        (status = 200, description = "Success", content_type = "text/plain", body = String),
        (status = 401, description = "Missing or bad credentials", body = crate::infra::error::ErrorBody),
    ),
    security(
        ("basic" = [])
    )
)]
#[instrument]
pub async fn hello(user: User) -> String {
    let identity = CallerIdentity::from(user);
    greeting_service::greet(&identity)
}

#[cfg(test)]
mod tests {
    use super::hello;
    use crate::infra::security::User;

    #[tokio::test]
    async fn hello_greets_user_by_name() {
        let response = hello(User::new("Alice".to_string())).await;
        assert_eq!("Hello, Alice!", response);
    }

    #[tokio::test]
    async fn concurrent_hellos_are_not_mixed_up() {
        let alice = tokio::spawn(hello(User::new("Alice".to_string())));
        let bob = tokio::spawn(hello(User::new("Bob".to_string())));
        let (alice, bob) = tokio::join!(alice, bob);
        assert_eq!("Hello, Alice!", alice.unwrap());
        assert_eq!("Hello, Bob!", bob.unwrap());
    }
}
