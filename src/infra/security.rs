//! HTTP Basic authentication against the configured users.

use super::{
    config::SecurityConfig,
    error::{ApiError, ApiResult, ClientError, InternalError},
};
use crate::core::identity::CallerIdentity;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use http::request::Parts;
use std::{collections::HashMap, sync::Arc};
use tracing::instrument;

/// The users that may sign in, keyed by username.
#[derive(Clone, Default)]
pub struct UserStore {
    password_hashes: Arc<HashMap<String, String>>,
}

impl UserStore {
    /// Constructs a [`UserStore`] from the configured users.
    pub fn from_config(config: &SecurityConfig) -> Self {
        let password_hashes = config
            .users
            .iter()
            .map(|u| (u.username.clone(), u.password_hash.clone()))
            .collect();
        Self {
            password_hashes: Arc::new(password_hashes),
        }
    }

    fn password_hash(&self, username: &str) -> Option<&str> {
        self.password_hashes.get(username).map(String::as_str)
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(self.password_hashes.keys())
            .finish()
    }
}

/// An authenticated user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    username: String,
}

impl User {
    /// Constructs a [`User`] that has already been authenticated.
    pub(crate) fn new(username: String) -> Self {
        Self { username }
    }

    /// The name the user signed in with.
    pub fn username(&self) -> &str {
        self.username.as_ref()
    }
}

impl From<User> for CallerIdentity {
    fn from(user: User) -> Self {
        CallerIdentity::new(user.username)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for User
where
    UserStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Get authorization header
        let TypedHeader(auth) =
            TypedHeader::<Authorization<Basic>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ClientError::Unauthorized)?;

        // Authenticate user
        let store = UserStore::from_ref(state);
        authenticate(&store, auth.username(), auth.password()).await
    }
}

/// Validate a user's password.
#[instrument(skip(store, password))]
pub async fn authenticate(store: &UserStore, username: &str, password: &str) -> ApiResult<User> {
    tracing::info!("Fetching {}'s password", username);
    let Some(hash) = store.password_hash(username) else {
        tracing::info!("Unknown user");
        return Err(ClientError::Unauthorized.into());
    };

    tracing::info!("Verifying password");
    let hash = hash.to_string();
    let password = password.to_string();
    let password_is_ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(InternalError::JoinError)??;
    if password_is_ok {
        Ok(User::new(username.to_string()))
    } else {
        Err(ClientError::Unauthorized.into())
    }
}

#[cfg(test)]
mod tests {
    use super::{authenticate, UserStore};
    use crate::infra::{
        config::{SecurityConfig, UserCredentials},
        error::{ApiError, ClientError, InternalError},
    };

    fn store() -> UserStore {
        let config = SecurityConfig {
            users: vec![
                UserCredentials::new("user", bcrypt::hash("user", 4).unwrap()),
                UserCredentials::new("broken", "not a bcrypt hash"),
            ],
            ..Default::default()
        };
        UserStore::from_config(&config)
    }

    #[tokio::test]
    async fn user_with_correct_password_can_login() {
        let user = authenticate(&store(), "user", "user").await.unwrap();
        assert_eq!("user", user.username());
    }

    #[tokio::test]
    async fn user_with_incorrect_password_cannot_login() {
        let result = authenticate(&store(), "user", "notuser").await;
        assert!(matches!(
            result,
            Err(ApiError::ClientError(ClientError::Unauthorized))
        ))
    }

    #[tokio::test]
    async fn unknown_user_cannot_login() {
        let result = authenticate(&store(), "nobody", "user").await;
        assert!(matches!(
            result,
            Err(ApiError::ClientError(ClientError::Unauthorized))
        ))
    }

    #[tokio::test]
    async fn malformed_hash_is_an_internal_error() {
        let result = authenticate(&store(), "broken", "anything").await;
        assert!(matches!(
            result,
            Err(ApiError::InternalError(InternalError::BcryptError(_)))
        ))
    }

    #[test]
    fn debug_output_lists_only_usernames() {
        let debug = format!("{:?}", store());
        assert!(debug.contains("user"));
        assert!(!debug.contains("$2"));
    }
}
