//! Optional observability hooks invoked around every call.
//!
//! The [`Client`](crate::Client) calls an [`Instrumentation`] at fixed
//! points: span start, each path part, the request body, before and after
//! the transport call, on error, and on close. When no instrumentation is
//! configured none of these run.
//!
//! [`TracingInstrumentation`] maps the hooks onto a `tracing` span with
//! OpenTelemetry-style field names, so any `tracing-opentelemetry` layer can
//! export it.

use tracing::{Span, debug, field, info_span};

use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::Response;

/// Endpoints whose request body is a query worth recording.
const SEARCH_ENDPOINTS: &[&str] = &["search", "count", "msearch", "search_template"];

/// Hooks invoked by the client around one API call.
///
/// Every method has a no-op default, so an implementation only overrides
/// what it cares about. `endpoint` is the dotted endpoint name, e.g.
/// `cat.nodeattrs`.
#[allow(unused_variables)]
pub trait Instrumentation: Send + Sync + std::fmt::Debug {
    /// Opens the span for one call.
    fn start(&self, endpoint: &'static str) -> Span {
        Span::none()
    }

    /// Ends the span opened by [`start`](Self::start).
    fn close(&self, span: Span) {}

    /// Records a failure, either local or from the transport.
    fn record_error(&self, span: &Span, error: &ApiError) {}

    /// Records one named path parameter, e.g. `("index", "logs")`.
    fn record_path_part(&self, span: &Span, name: &str, value: &str) {}

    /// Records the encoded request body.
    fn record_request_body(&self, span: &Span, endpoint: &str, body: &[u8]) {}

    /// Called right before the transport is invoked.
    fn before_request(&self, span: &Span, request: &ApiRequest, endpoint: &str) {}

    /// Called right after the transport returns; `response` is `None` when
    /// the transport failed.
    fn after_request(
        &self,
        span: &Span,
        request: &ApiRequest,
        response: Option<&Response>,
        endpoint: &str,
    ) {
    }
}

/// [`Instrumentation`] backed by `tracing` spans.
///
/// ## Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use sonar_lib::{Client, TracingInstrumentation};
///
/// let client = Client::new(transport)
///     .with_instrumentation(Arc::new(TracingInstrumentation::new().with_request_body(true)));
/// ```
#[derive(Debug, Clone)]
pub struct TracingInstrumentation {
    system: String,
    record_body: bool,
}

impl Default for TracingInstrumentation {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingInstrumentation {
    /// Creates the instrumentation with `db.system = "elasticsearch"` and
    /// request body recording off.
    pub fn new() -> Self {
        Self {
            system: "elasticsearch".to_string(),
            record_body: false,
        }
    }

    /// Overrides the `db.system` attribute, e.g. `opensearch`.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    /// Records search request bodies into `db.statement`.
    ///
    /// Query bodies may contain user data; leave this off unless the
    /// collector is trusted.
    pub fn with_request_body(mut self, enabled: bool) -> Self {
        self.record_body = enabled;
        self
    }
}

impl Instrumentation for TracingInstrumentation {
    fn start(&self, endpoint: &'static str) -> Span {
        info_span!(
            "search_request",
            db.system = self.system.as_str(),
            db.operation = endpoint,
            db.statement = field::Empty,
            db.path_parts.index = field::Empty,
            db.path_parts.id = field::Empty,
            http.method = field::Empty,
            url.path = field::Empty,
            http.status_code = field::Empty,
            error.message = field::Empty,
            otel.kind = "client",
            otel.status_code = field::Empty,
        )
    }

    fn close(&self, span: Span) {
        debug!(parent: &span, "search request closed");
    }

    fn record_error(&self, span: &Span, error: &ApiError) {
        span.record("otel.status_code", "ERROR");
        span.record("error.message", field::display(error));
        debug!(parent: span, error = %error, "search request failed");
    }

    fn record_path_part(&self, span: &Span, name: &str, value: &str) {
        match name {
            "index" => {
                span.record("db.path_parts.index", value);
            }
            "id" => {
                span.record("db.path_parts.id", value);
            }
            _ => debug!(parent: span, part = name, value, "path part"),
        }
    }

    fn record_request_body(&self, span: &Span, endpoint: &str, body: &[u8]) {
        if self.record_body && SEARCH_ENDPOINTS.contains(&endpoint) {
            span.record("db.statement", String::from_utf8_lossy(body).as_ref());
        }
    }

    fn before_request(&self, span: &Span, request: &ApiRequest, _endpoint: &str) {
        span.record("http.method", field::display(request.method));
        span.record("url.path", request.path_string().as_str());
    }

    fn after_request(
        &self,
        span: &Span,
        _request: &ApiRequest,
        response: Option<&Response>,
        endpoint: &str,
    ) {
        let Some(response) = response else {
            return;
        };
        span.record("http.status_code", response.status_code);
        // 4xx is the caller's concern, only 5xx marks the span as failed
        let otel_status = if response.status_code >= 500 { "ERROR" } else { "OK" };
        span.record("otel.status_code", otel_status);
        debug!(
            parent: span,
            endpoint,
            status = response.status_code,
            "search request finished"
        );
    }
}
