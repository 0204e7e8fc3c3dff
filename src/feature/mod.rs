//! The features of our API, one module per group of endpoints.

pub mod hello;
pub mod info;
