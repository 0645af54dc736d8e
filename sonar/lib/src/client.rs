//! The client: one generic `send` drives every endpoint.

use std::sync::Arc;

use tracing::{Instrument, debug};

use crate::endpoints::Endpoint;
use crate::error::ApiError;
use crate::instrumentation::Instrumentation;
use crate::response::Response;
use crate::transport::{ReqwestTransport, Transport, TransportConfig};

/// Sends endpoint requests through a [`Transport`], reporting to an
/// optional [`Instrumentation`].
///
/// Cloning is cheap; clones share the transport and the instrumentation.
///
/// ## Examples
///
/// ```rust,ignore
/// use sonar_lib::{Client, TransportConfig};
/// use sonar_lib::endpoints::Get;
///
/// let client = Client::from_config(TransportConfig::from_env()?)?;
/// let response = client.send(Get::new("books", "42")).await?;
/// if response.status_code == 404 {
///     println!("not found");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    instrumentation: Option<Arc<dyn Instrumentation>>,
}

impl Client {
    /// Creates a client over any transport, without instrumentation.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            instrumentation: None,
        }
    }

    /// Creates a client over a [`ReqwestTransport`] built from `config`.
    ///
    /// ## Errors
    ///
    /// Returns an error if a configured header is invalid or the HTTP
    /// client cannot be constructed.
    pub fn from_config(config: TransportConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Attaches instrumentation hooks to every call.
    pub fn with_instrumentation(mut self, instrumentation: Arc<dyn Instrumentation>) -> Self {
        self.instrumentation = Some(instrumentation);
        self
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Builds the request for `endpoint`, sends it and returns the response.
    ///
    /// Any HTTP status, including 4xx and 5xx, comes back as `Ok`; use
    /// [`Response::error_for_status`] to turn those into errors.
    ///
    /// ## Errors
    ///
    /// - A local [`ApiError::Config`] or [`ApiError::Validation`] when the
    ///   request cannot be built; the transport is not called.
    /// - [`ApiError::Client`] carrying the transport's error unchanged.
    pub async fn send<E: Endpoint>(&self, endpoint: E) -> Result<Response, ApiError> {
        let Some(hooks) = self.instrumentation.as_deref() else {
            let request = endpoint.into_request()?;
            debug!(endpoint = E::NAME, method = %request.method, "dispatching");
            return Ok(self.transport.perform(&request).await?);
        };

        let span = hooks.start(E::NAME);

        let request = match endpoint.into_request() {
            Ok(request) => request,
            Err(err) => {
                hooks.record_error(&span, &err);
                hooks.close(span);
                return Err(err);
            }
        };

        for (name, value) in &request.path_parts {
            hooks.record_path_part(&span, name, value);
        }
        if let Some(body) = &request.body {
            hooks.record_request_body(&span, E::NAME, body);
        }

        hooks.before_request(&span, &request, E::NAME);
        debug!(endpoint = E::NAME, method = %request.method, "dispatching");
        let result = self
            .transport
            .perform(&request)
            .instrument(span.clone())
            .await;
        hooks.after_request(&span, &request, result.as_ref().ok(), E::NAME);

        let result = result.map_err(ApiError::from);
        if let Err(err) = &result {
            hooks.record_error(&span, err);
        }
        hooks.close(span);
        result
    }
}
