//! The identity of whoever is calling us.

use serde::Serialize;

/// An authenticated caller.
///
/// Built by the authentication layer once credentials have been verified,
/// and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallerIdentity {
    name: String,
}

impl CallerIdentity {
    /// Constructs a new [`CallerIdentity`].
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The name of the caller.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }
}
