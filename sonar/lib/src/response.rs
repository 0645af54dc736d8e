//! Thin wrapper around a raw HTTP response.

use std::fmt;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, WARNING};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, AuthError, ClientError, ValidationError};

/// The raw result of one API call.
///
/// Every status code is returned as data; call [`Response::is_error`] or
/// [`Response::error_for_status`] to treat non-success codes as failures.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body; empty for HEAD requests.
    pub body: Bytes,
}

impl Response {
    pub fn new(status_code: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status_code,
            headers,
            body: body.into(),
        }
    }

    /// Returns `true` for status codes above 299.
    pub fn is_error(&self) -> bool {
        self.status_code > 299
    }

    /// Converts a non-success response into an error.
    ///
    /// 401 maps to [`AuthError::AuthenticationFailed`], 403 to
    /// [`AuthError::InsufficientPermissions`], and any other code above 299
    /// to [`ClientError::HttpStatus`] carrying the body (or the canonical
    /// reason when the body is empty).
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if !self.is_error() {
            return Ok(self);
        }
        let message = if self.body.is_empty() {
            self.reason().to_string()
        } else {
            String::from_utf8_lossy(&self.body).into_owned()
        };
        match self.status_code {
            401 => Err(AuthError::AuthenticationFailed { message }.into()),
            403 => Err(AuthError::InsufficientPermissions { message }.into()),
            status => Err(ClientError::HttpStatus { status, message }.into()),
        }
    }

    /// Deserializes the body as JSON.
    ///
    /// ## Errors
    ///
    /// Returns [`ValidationError::EmptyBody`] for an empty body and
    /// [`ValidationError::JsonParse`] when the body is not valid for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ValidationError> {
        if self.body.is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        serde_json::from_slice(&self.body).map_err(ValidationError::JsonParse)
    }

    /// Deserializes the body as YAML, as returned with `format=yaml`.
    pub fn yaml<T: DeserializeOwned>(&self) -> Result<T, ValidationError> {
        if self.body.is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        Ok(serde_yaml::from_slice(&self.body)?)
    }

    /// Returns the body as UTF-8 text.
    pub fn text(&self) -> Result<String, ValidationError> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }

    /// Returns the values of every `Warning` header, in order.
    ///
    /// The server uses these for deprecation notices.
    pub fn warnings(&self) -> Vec<String> {
        self.headers
            .get_all(WARNING)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    pub fn has_warnings(&self) -> bool {
        self.headers.contains_key(WARNING)
    }

    fn reason(&self) -> &'static str {
        StatusCode::from_u16(self.status_code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {}] {}",
            self.status_code,
            self.reason(),
            String::from_utf8_lossy(&self.body)
        )
    }
}
