//! Global application state.
//!
//! Used for access to common resources such as the
//! configuration or the known users.

use super::{config::Config, security::UserStore};
use axum::extract::FromRef;
use std::sync::Arc;

/// Global application state.
#[derive(Clone, Debug, FromRef)]
pub struct AppState {
    config: Arc<Config>,
    users: UserStore,
}

impl AppState {
    /// Constructs a new [`AppState`].
    pub fn new(config: Config) -> Self {
        let users = UserStore::from_config(&config.security);
        Self {
            config: Arc::new(config),
            users,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
