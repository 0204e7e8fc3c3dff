//! For reading application configuration.

use serde::Deserialize;
use std::time::Duration;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Security configuration.
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server address.
    pub http_address: String,
    /// Server http port.
    pub http_port: u16,
    /// How long a request may take before it is aborted.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// The maximum number of requests handled at once.
    pub concurrency_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_address: "127.0.0.1".to_string(),
            http_port: 8080,
            request_timeout: Duration::from_secs(10),
            concurrency_limit: 100,
        }
    }
}

/// Security configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// The realm announced to clients that fail to authenticate.
    pub realm: String,
    /// The users that may sign in.
    pub users: Vec<UserCredentials>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            realm: "hello".to_string(),
            users: Vec::new(),
        }
    }
}

/// A user that may sign in, and the bcrypt hash of their password.
#[derive(Clone, Deserialize)]
pub struct UserCredentials {
    /// The username.
    pub username: String,
    /// A bcrypt hash of the user's password.
    pub password_hash: String,
}

impl UserCredentials {
    /// Constructs a new [`UserCredentials`].
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Retrieve [`Config`] from the default configuration file.
///
/// The file is optional, and every value can be overridden with
/// environment variables such as `APP__SERVER__HTTP_PORT`.
#[tracing::instrument]
pub fn load_config() -> color_eyre::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("app").separator("__"))
        .build()?
        .try_deserialize()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\nhttp_port = 3000\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(3000, config.server.http_port);
        assert_eq!("127.0.0.1", config.server.http_address);
        assert_eq!(Duration::from_secs(10), config.server.request_timeout);
        assert_eq!(100, config.server.concurrency_limit);
        assert_eq!("hello", config.security.realm);
        assert!(config.security.users.is_empty());
    }

    #[test]
    fn users_and_timeout_are_read() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                request_timeout = "2s 500ms"

                [security]
                realm = "greetings"

                [[security.users]]
                username = "Bob"
                password_hash = "$2b$04$abc"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(Duration::from_millis(2500), config.server.request_timeout);
        assert_eq!("greetings", config.security.realm);
        assert_eq!(1, config.security.users.len());
        assert_eq!("Bob", config.security.users[0].username);
    }

    #[test]
    fn debug_output_hides_password_hash() {
        let credentials = UserCredentials::new("Bob", "$2b$04$secret");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("Bob"));
        assert!(!debug.contains("secret"));
    }
}
