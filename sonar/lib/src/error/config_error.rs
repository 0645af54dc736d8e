//! Request building and configuration errors.

use thiserror::Error;

/// Errors in request construction or client configuration.
///
/// These are produced locally, before anything is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("URL cannot be used as a base: {url}")]
    CannotBeABase {
        /// The offending URL.
        url: String,
    },

    /// A required path parameter was empty.
    #[error("{endpoint}: missing required path parameter `{param}`")]
    MissingPathParam {
        /// Endpoint name, e.g. `get`.
        endpoint: &'static str,
        /// Path parameter name, e.g. `id`.
        param: &'static str,
    },

    /// A required configuration field is missing.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Header name or value could not be encoded.
    #[error("Invalid header `{name}`: {message}")]
    InvalidHeader {
        /// The header name as given.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// A configuration value could not be parsed.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// The configuration key, usually an environment variable.
        key: String,
        /// The raw value.
        value: String,
    },
}

impl ConfigError {
    /// Creates a missing path parameter error.
    pub fn missing_path_param(endpoint: &'static str, param: &'static str) -> Self {
        Self::MissingPathParam { endpoint, param }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Creates an invalid header error.
    pub fn invalid_header(name: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.to_string(),
        }
    }
}
