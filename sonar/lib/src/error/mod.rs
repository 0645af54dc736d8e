//! Layered error types for the client.
//!
//! - [`ApiError`] - Top-level error returned by [`Client::send`](crate::Client::send)
//! - [`ClientError`] - Transport, network and HTTP status errors
//! - [`ValidationError`] - Body serialization and response parsing errors
//! - [`AuthError`] - Credential and authorization errors
//! - [`ConfigError`] - Request building and configuration errors

mod api_error;
mod auth_error;
mod client_error;
mod config_error;
mod validation_error;

pub use api_error::ApiError;
pub use auth_error::AuthError;
pub use client_error::ClientError;
pub use config_error::ConfigError;
pub use validation_error::ValidationError;
