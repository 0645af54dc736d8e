//! Authentication and authorization errors.

use thiserror::Error;

/// Errors related to credentials.
///
/// These occur while resolving credentials from the environment or when the
/// server rejects them (see [`Response::error_for_status`](crate::Response::error_for_status)).
#[derive(Debug, Error)]
pub enum AuthError {
    /// Half of a credential pair is configured and the other half is not.
    #[error("Missing credentials: none of the following environment variables are set: {env_vars:?}")]
    MissingCredential {
        /// The environment variables that were checked.
        env_vars: Vec<String>,
    },

    /// Server rejected the credentials (HTTP 401).
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Response body returned by the server.
        message: String,
    },

    /// Credentials are valid but lack the required privilege (HTTP 403).
    #[error("Insufficient permissions: {message}")]
    InsufficientPermissions {
        /// Response body returned by the server.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_display() {
        let err = AuthError::MissingCredential {
            env_vars: vec!["SONAR_PASSWORD".to_string()],
        };
        assert!(err.to_string().contains("SONAR_PASSWORD"));
    }

    #[test]
    fn test_insufficient_permissions_display() {
        let err = AuthError::InsufficientPermissions {
            message: "action [cluster:monitor/health] is unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient permissions: action [cluster:monitor/health] is unauthorized"
        );
    }
}
