//! The transport seam: one capability that sends a request.
//!
//! [`Transport`] is the only interface the [`Client`](crate::Client) needs.
//! Inject your own implementation for retries, pooling across nodes, or
//! tests; [`ReqwestTransport`] is the default, built on `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap};
use tracing::{debug, trace};
use url::Url;

use crate::error::{ApiError, AuthError, ClientError, ConfigError};
use crate::request::{ApiRequest, header_pair};
use crate::response::Response;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default server URL when none is configured.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Sends a built request and returns the raw response.
///
/// Implementations return every HTTP status as a [`Response`]; only
/// failures to obtain a response at all are errors.
///
/// ## Examples
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use sonar_lib::{ApiRequest, ClientError, Response, Transport};
///
/// #[derive(Debug)]
/// struct AlwaysOk;
///
/// #[async_trait]
/// impl Transport for AlwaysOk {
///     async fn perform(&self, _request: &ApiRequest) -> Result<Response, ClientError> {
///         Ok(Response::new(200, Default::default(), "{}"))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Sends `request` and returns the response.
    async fn perform(&self, request: &ApiRequest) -> Result<Response, ClientError>;
}

/// Credentials applied to every request by [`ReqwestTransport`].
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication.
    #[default]
    None,
    /// HTTP Basic authentication.
    Basic {
        /// User name.
        username: String,
        /// Password.
        password: String,
    },
    /// Encoded API key, sent as `Authorization: ApiKey <key>`.
    ApiKey(String),
    /// Bearer token, sent as `Authorization: Bearer <token>`.
    Bearer(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::ApiKey(_) => write!(f, "ApiKey(***)"),
            Self::Bearer(_) => write!(f, "Bearer(***)"),
        }
    }
}

/// Plain configuration for a [`ReqwestTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Server base URL.
    pub url: Url,
    /// Credentials applied to every request.
    pub credentials: Credentials,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Headers sent with every request.
    pub headers: Vec<(String, String)>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_URL).expect("default URL is valid"),
            credentials: Credentials::None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            headers: Vec::new(),
        }
    }
}

impl TransportConfig {
    /// Reads configuration from the environment.
    ///
    /// | variable | meaning |
    /// |---|---|
    /// | `SONAR_URL` | base URL, default `http://localhost:9200` |
    /// | `SONAR_USERNAME` / `SONAR_PASSWORD` | basic auth, both required |
    /// | `SONAR_API_KEY` | encoded API key |
    /// | `SONAR_BEARER_TOKEN` | bearer token |
    /// | `SONAR_TIMEOUT_SECS` | request timeout in seconds |
    ///
    /// An API key wins over a bearer token, which wins over basic auth.
    ///
    /// ## Errors
    ///
    /// Returns an error for an unparsable URL or timeout, or a username
    /// without a password.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ApiError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get("SONAR_URL") {
            config.url = Url::parse(url.trim()).map_err(ConfigError::InvalidUrl)?;
        }

        if let Some(secs) = get("SONAR_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "SONAR_TIMEOUT_SECS".to_string(),
                value: secs.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.credentials = if let Some(key) = get("SONAR_API_KEY") {
            Credentials::ApiKey(key)
        } else if let Some(token) = get("SONAR_BEARER_TOKEN") {
            Credentials::Bearer(token)
        } else if let Some(username) = get("SONAR_USERNAME") {
            let password = get("SONAR_PASSWORD").ok_or_else(|| AuthError::MissingCredential {
                env_vars: vec!["SONAR_PASSWORD".to_string()],
            })?;
            Credentials::Basic { username, password }
        } else {
            Credentials::None
        };

        Ok(config)
    }
}

/// Builder for configuring a [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    base_url: Url,
    timeout: Duration,
    default_headers: HeaderMap,
    credentials: Credentials,
}

impl ReqwestTransportBuilder {
    fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
            credentials: Credentials::None,
        }
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header to all requests.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let (name, value) = header_pair(name.as_ref(), value.as_ref())?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the credentials applied to every request.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Builds the [`ReqwestTransport`].
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::CannotBeABase`] if the base URL cannot carry
    /// a path, or a client error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ReqwestTransport, ApiError> {
        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::CannotBeABase {
                url: self.base_url.to_string(),
            }
            .into());
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(ClientError::from)?;

        Ok(ReqwestTransport {
            client,
            base_url: self.base_url,
            credentials: self.credentials,
            timeout: self.timeout,
        })
    }
}

/// Default [`Transport`] built on a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a new builder for the given base URL.
    pub fn builder(base_url: Url) -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new(base_url)
    }

    /// Creates a transport with default settings.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        Self::builder(base_url).build()
    }

    /// Creates a transport from a [`TransportConfig`].
    pub fn from_config(config: TransportConfig) -> Result<Self, ApiError> {
        let mut builder = Self::builder(config.url)
            .timeout(config.timeout)
            .credentials(config.credentials);
        for (name, value) in &config.headers {
            builder = builder.default_header(name, value)?;
        }
        builder.build()
    }

    /// Returns the base URL for this transport.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn apply_credentials(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Credentials::None => request,
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::ApiKey(key) => request.header(AUTHORIZATION, format!("ApiKey {key}")),
            Credentials::Bearer(token) => request.bearer_auth(token),
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ClientError::Request(err)
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform(&self, request: &ApiRequest) -> Result<Response, ClientError> {
        // the base URL and the request headers are validated before this
        // point, so failures here are not connection problems
        let url = request.url(&self.base_url).map_err(ClientError::transport)?;
        debug!(method = %request.method, url = %url, "sending request");

        let mut builder = self.client.request(request.method.to_reqwest(), url);
        builder = self.apply_credentials(builder);

        for (name, value) in &request.headers {
            let (name, value) = header_pair(name, value).map_err(ClientError::transport)?;
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            // an explicit Content-Type header was already applied above
            if request.header(CONTENT_TYPE.as_str()).is_none() {
                if let Some(content_type) = &request.body_content_type {
                    builder = builder.header(CONTENT_TYPE, content_type.as_str());
                }
            }
            trace!(bytes = body.len(), "attaching request body");
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status_code = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| self.map_send_error(e))?;
        debug!(status = status_code, bytes = body.len(), "received response");

        Ok(Response::new(status_code, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = TransportConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.url.as_str(), "http://localhost:9200/");
        assert_eq!(config.credentials, Credentials::None);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_basic_auth() {
        let config = TransportConfig::from_lookup(lookup(&[
            ("SONAR_URL", "https://search.internal:9200"),
            ("SONAR_USERNAME", "elastic"),
            ("SONAR_PASSWORD", "changeme"),
            ("SONAR_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.url.host_str(), Some("search.internal"));
        assert_eq!(
            config.credentials,
            Credentials::Basic {
                username: "elastic".to_string(),
                password: "changeme".to_string()
            }
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_bearer_wins_over_basic() {
        let config = TransportConfig::from_lookup(lookup(&[
            ("SONAR_BEARER_TOKEN", "tok-123"),
            ("SONAR_USERNAME", "elastic"),
            ("SONAR_PASSWORD", "changeme"),
        ]))
        .unwrap();
        assert_eq!(config.credentials, Credentials::Bearer("tok-123".to_string()));
        assert_eq!(format!("{:?}", config.credentials), "Bearer(***)");
    }

    #[test]
    fn test_config_api_key_wins() {
        let config = TransportConfig::from_lookup(lookup(&[
            ("SONAR_API_KEY", "abc=="),
            ("SONAR_BEARER_TOKEN", "tok"),
            ("SONAR_USERNAME", "elastic"),
        ]))
        .unwrap();
        assert_eq!(config.credentials, Credentials::ApiKey("abc==".to_string()));
    }

    #[test]
    fn test_config_username_without_password() {
        let err = TransportConfig::from_lookup(lookup(&[("SONAR_USERNAME", "elastic")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Auth(AuthError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_config_invalid_timeout() {
        let err = TransportConfig::from_lookup(lookup(&[("SONAR_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_config_invalid_url() {
        let err = TransportConfig::from_lookup(lookup(&[("SONAR_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let creds = Credentials::Basic {
            username: "elastic".to_string(),
            password: "changeme".to_string(),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("elastic"));
        assert!(!debug.contains("changeme"));
        assert_eq!(format!("{:?}", Credentials::ApiKey("k".into())), "ApiKey(***)");
    }

    #[test]
    fn test_invalid_default_header() {
        let base = Url::parse(DEFAULT_URL).unwrap();
        let result = ReqwestTransport::builder(base).default_header("bad header", "v");
        assert!(matches!(result, Err(ConfigError::InvalidHeader { .. })));
    }

    #[test]
    fn test_build_rejects_non_base_url() {
        let base = Url::parse("mailto:ops@example.com").unwrap();
        let err = ReqwestTransport::new(base).unwrap_err();
        assert!(err.is_local());
        assert!(matches!(err, ApiError::Config(ConfigError::CannotBeABase { .. })));
    }

    #[test]
    fn test_from_config_keeps_base_url() {
        let transport = ReqwestTransport::from_config(TransportConfig::default()).unwrap();
        assert_eq!(transport.base_url().as_str(), "http://localhost:9200/");
    }
}
