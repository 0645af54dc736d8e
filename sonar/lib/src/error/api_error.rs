//! Top-level API error type.

use super::{AuthError, ClientError, ConfigError, ValidationError};
use thiserror::Error;

/// Top-level error type for all client operations.
///
/// Local failures (a request that could not be built) surface as
/// [`ApiError::Config`] or [`ApiError::Validation`]. Whatever the transport
/// returns is passed through untouched inside [`ApiError::Client`].
///
/// ## Examples
///
/// ```rust,ignore
/// use sonar_lib::ApiError;
///
/// fn handle_error(err: ApiError) {
///     match err {
///         ApiError::Client(e) => eprintln!("Transport error: {e}"),
///         ApiError::Validation(e) => eprintln!("Bad body: {e}"),
///         ApiError::Auth(e) => eprintln!("Auth failed: {e}"),
///         ApiError::Config(e) => eprintln!("Invalid request: {e}"),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport errors (network, timeout, HTTP status when requested).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Body serialization or response parsing errors.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Authentication and authorization errors.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Request building and configuration errors.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Returns `true` if the error was produced before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Validation(_))
    }
}
