//! A service for greeting someone.

use crate::core::identity::CallerIdentity;
use tracing::instrument;

/// Returns a greeting for the caller.
///
/// ```rust
/// use hello_server::core::{greeting::greeting_service::greet, identity::CallerIdentity};
///
/// assert_eq!("Hello, Alice!", greet(&CallerIdentity::new("Alice")));
/// ```
#[instrument(ret)]
pub fn greet(identity: &CallerIdentity) -> String {
    format!("Hello, {}!", identity.name())
}
