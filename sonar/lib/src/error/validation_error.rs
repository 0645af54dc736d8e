//! Body serialization and response parsing errors.

use thiserror::Error;

use crate::method::RestMethod;

/// Errors while encoding a request body or decoding a response body.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    JsonParse(#[source] serde_json::Error),

    /// YAML parsing failed.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Request body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Response body is not valid UTF-8.
    #[error("Response body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A body was attached to a request whose verb does not carry one.
    #[error("{method} requests cannot carry a body")]
    BodyNotAllowed {
        /// The request verb.
        method: RestMethod,
    },

    /// Empty response body when content was expected.
    #[error("Empty response body")]
    EmptyBody,
}
