//! A web service that greets its authenticated callers.

pub mod core;
pub mod feature;
pub mod infra;
pub mod server;
