//! Transport and network errors.

use thiserror::Error;

/// Errors raised by a [`Transport`](crate::Transport).
///
/// The client never inspects or rewrites these; they reach the caller as
/// produced by the transport.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed due to network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned a non-success HTTP status code.
    ///
    /// Only produced by [`Response::error_for_status`](crate::Response::error_for_status);
    /// `Client::send` hands back every response as data.
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: u16,
        /// Response body, or the canonical reason when the body is empty.
        message: String,
    },

    /// Request exceeded the configured timeout.
    #[error("Request timeout after {duration_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        duration_ms: u64,
    },

    /// Failed to establish connection to the server.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Error from a caller-supplied transport.
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ClientError {
    /// Wraps an arbitrary error raised by a custom transport.
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }

    /// Returns `true` if this error is retryable.
    ///
    /// The client does not retry; this is a hint for transports that do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection(_) => true,
            // 502-504 and 429 are transient for search clusters
            Self::HttpStatus { status, .. } => matches!(*status, 429 | 502 | 503 | 504),
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::Transport(_) => false,
        }
    }

    /// Returns the HTTP status code if this is an HTTP status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_retryable() {
        let err = ClientError::Timeout { duration_ms: 5000 };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_connection_is_retryable() {
        let err = ClientError::Connection("connection refused".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_503_and_429_are_retryable() {
        for status in [429, 502, 503, 504] {
            let err = ClientError::HttpStatus {
                status,
                message: String::new(),
            };
            assert!(err.is_retryable(), "{status} should be retryable");
        }
    }

    #[test]
    fn test_400_and_500_not_retryable() {
        for status in [400, 404, 500] {
            let err = ClientError::HttpStatus {
                status,
                message: String::new(),
            };
            assert!(!err.is_retryable(), "{status} should not be retryable");
        }
    }

    #[test]
    fn test_custom_transport_error() {
        let err = ClientError::transport("mock exploded");
        assert!(!err.is_retryable());
        assert_eq!(err.status_code(), None);
        assert_eq!(err.to_string(), "Transport error: mock exploded");
    }

    #[test]
    fn test_status_code_extraction() {
        let err = ClientError::HttpStatus {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.status_code(), Some(404));

        let timeout = ClientError::Timeout { duration_ms: 1000 };
        assert_eq!(timeout.status_code(), None);
    }
}
