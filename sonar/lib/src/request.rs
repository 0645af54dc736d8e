//! Request building primitives shared by every endpoint.
//!
//! An endpoint struct is turned into an [`ApiRequest`]: plain data holding
//! the verb, the raw path segments, an ordered [`QueryParams`] list, extra
//! headers and an optional encoded body. Nothing here touches the network;
//! the [`Transport`](crate::Transport) turns an `ApiRequest` into bytes on
//! the wire.
//!
//! Optional parameters follow one rule: an unset value is never sent. That
//! is why booleans and integers are `Option`s rather than defaults, so
//! "unset" and `false`/`0` stay distinguishable.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

use crate::error::{ConfigError, ValidationError};
use crate::method::RestMethod;

/// Content type for JSON bodies.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type for newline-delimited JSON bodies (bulk API).
pub const CONTENT_TYPE_NDJSON: &str = "application/x-ndjson";

/// Encodes a duration the way the search API expects time units.
///
/// Sub-millisecond values are sent in nanoseconds, everything else in
/// whole milliseconds.
///
/// ## Examples
///
/// ```rust
/// use std::time::Duration;
/// use sonar_lib::request::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(30)), "30000ms");
/// assert_eq!(format_duration(Duration::from_nanos(250)), "250nanos");
/// ```
pub fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_millis(1) {
        format!("{}nanos", duration.as_nanos())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Ordered list of query string parameters.
///
/// Setters skip unset values so the query string only ever contains what
/// the caller asked for. Insertion order is kept, which makes the encoded
/// URL deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter unconditionally.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Appends a string parameter; `None` and empty strings are skipped.
    pub fn string(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.push(key, value);
        }
    }

    /// Appends a boolean parameter as `true`/`false`; `None` is skipped.
    pub fn flag(&mut self, key: &str, value: Option<bool>) {
        if let Some(value) = value {
            self.push(key, value.to_string());
        }
    }

    /// Appends a numeric parameter; `None` is skipped.
    pub fn int<N: std::fmt::Display>(&mut self, key: &str, value: Option<N>) {
        if let Some(value) = value {
            self.push(key, value.to_string());
        }
    }

    /// Appends a comma-joined list; an empty list is skipped.
    pub fn list(&mut self, key: &str, values: &[String]) {
        if !values.is_empty() {
            self.push(key, values.join(","));
        }
    }

    /// Appends a duration encoded with [`format_duration`]; `None` is skipped.
    pub fn duration(&mut self, key: &str, value: Option<Duration>) {
        if let Some(value) = value {
            self.push(key, format_duration(value));
        }
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A request body before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// A single JSON document.
    Json(serde_json::Value),
    /// Newline-delimited JSON, one document per line.
    NdJson(Vec<serde_json::Value>),
    /// Pre-encoded bytes with an explicit content type.
    Raw {
        /// The encoded body.
        bytes: Bytes,
        /// The `Content-Type` to send with it.
        content_type: String,
    },
}

impl RequestBody {
    /// Serializes any value into a JSON body.
    ///
    /// ## Errors
    ///
    /// Returns [`ValidationError::Serialization`] if `value` cannot be
    /// represented as JSON (e.g. a map with non-string keys).
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ValidationError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(ValidationError::Serialization)
    }

    /// Returns the content type this body is sent with.
    pub fn content_type(&self) -> &str {
        match self {
            Self::Json(_) => CONTENT_TYPE_JSON,
            Self::NdJson(_) => CONTENT_TYPE_NDJSON,
            Self::Raw { content_type, .. } => content_type,
        }
    }

    /// Encodes the body into bytes.
    ///
    /// NDJSON bodies end with a newline, which the bulk API requires.
    pub fn to_bytes(&self) -> Result<Bytes, ValidationError> {
        match self {
            Self::Json(value) => serde_json::to_vec(value)
                .map(Bytes::from)
                .map_err(ValidationError::Serialization),
            Self::NdJson(lines) => {
                let mut out = Vec::new();
                for line in lines {
                    serde_json::to_writer(&mut out, line).map_err(ValidationError::Serialization)?;
                    out.push(b'\n');
                }
                Ok(Bytes::from(out))
            }
            Self::Raw { bytes, .. } => Ok(bytes.clone()),
        }
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Response-shaping options and headers accepted by every endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonParams {
    /// Pretty-print the response body.
    pub pretty: bool,
    /// Return human readable values for statistics.
    pub human: bool,
    /// Include the stack trace of returned errors.
    pub error_trace: bool,
    /// Filter the returned response to these paths.
    pub filter_path: Vec<String>,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
}

impl CommonParams {
    /// Writes the options into `request`.
    ///
    /// Flags are only sent when set, always as `true`.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] if a header name or value
    /// cannot be sent over HTTP. Nothing is written in that case.
    pub fn apply(self, request: &mut ApiRequest) -> Result<(), ConfigError> {
        for (name, value) in &self.headers {
            header_pair(name, value)?;
        }

        if self.pretty {
            request.query.push("pretty", "true");
        }
        if self.human {
            request.query.push("human", "true");
        }
        if self.error_trace {
            request.query.push("error_trace", "true");
        }
        request.query.list("filter_path", &self.filter_path);
        request.headers.extend(self.headers);
        Ok(())
    }
}

/// Rejects an empty required path parameter.
///
/// ## Errors
///
/// Returns [`ConfigError::MissingPathParam`] when `value` is empty.
pub fn require_path_part(
    endpoint: &'static str,
    param: &'static str,
    value: &str,
) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::missing_path_param(endpoint, param));
    }
    Ok(())
}

/// Rejects an empty required list path parameter, including a list made
/// only of empty strings.
pub fn require_path_list(
    endpoint: &'static str,
    param: &'static str,
    values: &[String],
) -> Result<(), ConfigError> {
    if values.iter().all(|v| v.is_empty()) {
        return Err(ConfigError::missing_path_param(endpoint, param));
    }
    Ok(())
}

/// A fully built request, ready for a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: RestMethod,
    /// Raw path segments; encoded when the URL is built.
    pub path: Vec<String>,
    /// Named path parameters, reported to instrumentation.
    pub path_parts: Vec<(&'static str, String)>,
    /// Query string parameters.
    pub query: QueryParams,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
    /// Encoded body.
    pub body: Option<Bytes>,
    /// Content type of `body`.
    pub body_content_type: Option<String>,
}

impl ApiRequest {
    /// Creates a request for `/` with no parameters.
    pub fn new(method: RestMethod) -> Self {
        Self {
            method,
            path: Vec::new(),
            path_parts: Vec::new(),
            query: QueryParams::new(),
            headers: Vec::new(),
            body: None,
            body_content_type: None,
        }
    }

    /// Appends a literal path segment such as `_doc`.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.path.push(segment.into());
        self
    }

    /// Appends a named path parameter.
    pub fn path_part(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        self.path.push(value.clone());
        self.path_parts.push((name, value));
        self
    }

    /// Appends a comma-joined list path parameter.
    ///
    /// Empty entries are dropped; a list with nothing left is skipped.
    pub fn path_list(self, name: &'static str, values: &[String]) -> Self {
        let joined = values
            .iter()
            .filter(|v| !v.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        if joined.is_empty() {
            return self;
        }
        self.path_part(name, joined)
    }

    /// Encodes and attaches a body.
    ///
    /// ## Errors
    ///
    /// Returns [`ValidationError::BodyNotAllowed`] if the verb does not carry
    /// a body, or [`ValidationError::Serialization`] if the body cannot be
    /// encoded.
    pub fn body(mut self, body: RequestBody) -> Result<Self, ValidationError> {
        if !self.method.accepts_body() {
            return Err(ValidationError::BodyNotAllowed {
                method: self.method,
            });
        }
        self.body = Some(body.to_bytes()?);
        self.body_content_type = Some(body.content_type().to_string());
        Ok(self)
    }

    /// Returns the request path, e.g. `/my-index/_doc/1`, unencoded.
    pub fn path_string(&self) -> String {
        format!("/{}", self.path.join("/"))
    }

    /// Looks up an extra header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the `Content-Type` to send: an explicit header wins over the
    /// body's own type. `None` when there is neither.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
            .or(self.body_content_type.as_deref())
    }

    /// Builds the full URL against `base`.
    ///
    /// Path segments are appended after any path prefix already in `base`
    /// and percent-encoded individually, so an ID containing `/` stays one
    /// segment. An empty query produces a URL without `?`.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::CannotBeABase`] if `base` cannot carry a path.
    pub fn url(&self, base: &Url) -> Result<Url, ConfigError> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| ConfigError::CannotBeABase {
                url: base.to_string(),
            })?;
            segments.pop_if_empty();
            segments.extend(self.path.iter());
        }
        if self.query.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

/// Parses a header pair into its wire form.
pub(crate) fn header_pair(
    name: &str,
    value: &str,
) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let header_name =
        HeaderName::try_from(name).map_err(|e| ConfigError::invalid_header(name, e))?;
    let header_value =
        HeaderValue::try_from(value).map_err(|e| ConfigError::invalid_header(name, e))?;
    Ok((header_name, header_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:9200").unwrap()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_nanos(1)), "1nanos");
        assert_eq!(format_duration(Duration::from_micros(999)), "999000nanos");
        assert_eq!(format_duration(Duration::from_millis(1)), "1ms");
        assert_eq!(format_duration(Duration::from_secs(90)), "90000ms");
    }

    #[test]
    fn test_query_skips_unset_values() {
        let mut query = QueryParams::new();
        query.string("format", None);
        query.string("routing", Some(""));
        query.flag("local", None);
        query.int::<i64>("size", None);
        query.list("h", &[]);
        query.duration("timeout", None);
        assert!(query.is_empty());
    }

    #[test]
    fn test_query_keeps_false_and_zero() {
        let mut query = QueryParams::new();
        query.flag("local", Some(false));
        query.int("from", Some(0));
        assert_eq!(query.get("local"), Some("false"));
        assert_eq!(query.get("from"), Some("0"));
    }

    #[test]
    fn test_query_list_is_comma_joined() {
        let mut query = QueryParams::new();
        query.list("h", &["name".to_string(), "attr".to_string()]);
        assert_eq!(query.get("h"), Some("name,attr"));
    }

    #[test]
    fn test_common_params_only_send_set_flags() {
        let mut request = ApiRequest::new(RestMethod::Get);
        CommonParams::default().apply(&mut request).unwrap();
        assert!(request.query.is_empty());

        let mut request = ApiRequest::new(RestMethod::Get);
        CommonParams {
            pretty: true,
            error_trace: true,
            filter_path: vec!["hits.hits._id".to_string()],
            ..Default::default()
        }
        .apply(&mut request)
        .unwrap();
        let pairs: Vec<_> = request.query.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("pretty", "true"),
                ("error_trace", "true"),
                ("filter_path", "hits.hits._id")
            ]
        );
    }

    #[test]
    fn test_url_root_without_query() {
        let request = ApiRequest::new(RestMethod::Get);
        let url = request.url(&base()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9200/");
    }

    #[test]
    fn test_url_with_segments_and_query() {
        let mut request = ApiRequest::new(RestMethod::Get)
            .segment("_cat")
            .segment("nodeattrs");
        request.query.string("format", Some("json"));
        let url = request.url(&base()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9200/_cat/nodeattrs?format=json");
    }

    #[test]
    fn test_url_keeps_base_prefix() {
        let request = ApiRequest::new(RestMethod::Get).segment("_search");
        let with_slash = Url::parse("https://proxy.example.com/search/").unwrap();
        let without_slash = Url::parse("https://proxy.example.com/search").unwrap();
        assert_eq!(
            request.url(&with_slash).unwrap().as_str(),
            "https://proxy.example.com/search/_search"
        );
        assert_eq!(
            request.url(&without_slash).unwrap().as_str(),
            "https://proxy.example.com/search/_search"
        );
    }

    #[test]
    fn test_url_encodes_each_segment() {
        let request = ApiRequest::new(RestMethod::Get)
            .path_part("index", "logs")
            .segment("_doc")
            .path_part("id", "a/b c");
        let url = request.url(&base()).unwrap();
        assert_eq!(url.path(), "/logs/_doc/a%2Fb%20c");
        assert_eq!(request.path_string(), "/logs/_doc/a/b c");
        assert_eq!(
            request.path_parts,
            vec![("index", "logs".to_string()), ("id", "a/b c".to_string())]
        );
    }

    #[test]
    fn test_url_rejects_non_base() {
        let request = ApiRequest::new(RestMethod::Get);
        let base = Url::parse("mailto:ops@example.com").unwrap();
        assert!(matches!(
            request.url(&base),
            Err(ConfigError::CannotBeABase { .. })
        ));
    }

    #[test]
    fn test_path_list_joins_and_skips_empty() {
        let request = ApiRequest::new(RestMethod::Delete)
            .path_list("index", &["a".to_string(), "b".to_string()]);
        assert_eq!(request.path, vec!["a,b".to_string()]);

        let request = ApiRequest::new(RestMethod::Get).path_list("index", &[]);
        assert!(request.path.is_empty());
    }

    #[test]
    fn test_path_list_drops_empty_entries() {
        let request = ApiRequest::new(RestMethod::Delete)
            .path_list("index", &["books".to_string(), String::new()]);
        assert_eq!(request.path_string(), "/books");
        assert_eq!(request.path_parts, vec![("index", "books".to_string())]);

        let request = ApiRequest::new(RestMethod::Post)
            .path_list("index", &[String::new()])
            .segment("_search");
        assert_eq!(request.path_string(), "/_search");
        assert!(request.path_parts.is_empty());
    }

    #[test]
    fn test_common_params_reject_invalid_header() {
        let mut request = ApiRequest::new(RestMethod::Get);
        let err = CommonParams {
            pretty: true,
            headers: vec![("bad header".to_string(), "v".to_string())],
            ..Default::default()
        }
        .apply(&mut request)
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeader { ref name, .. } if name == "bad header"));
        assert!(request.query.is_empty());
        assert!(request.headers.is_empty());

        let mut request = ApiRequest::new(RestMethod::Get);
        let err = CommonParams {
            headers: vec![("X-Opaque-Id".to_string(), "line\nbreak".to_string())],
            ..Default::default()
        }
        .apply(&mut request);
        assert!(err.is_err());
    }

    #[test]
    fn test_require_path_part() {
        assert!(require_path_part("get", "id", "1").is_ok());
        assert!(matches!(
            require_path_part("get", "id", ""),
            Err(ConfigError::MissingPathParam {
                endpoint: "get",
                param: "id"
            })
        ));
        assert!(require_path_list("indices.delete", "index", &[String::new()]).is_err());
        assert!(require_path_list("indices.delete", "index", &[]).is_err());
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = ApiRequest::new(RestMethod::Post)
            .body(RequestBody::Json(serde_json::json!({"query": {"match_all": {}}})))
            .unwrap();
        assert_eq!(request.content_type(), Some(CONTENT_TYPE_JSON));
        assert_eq!(
            request.body.as_deref(),
            Some(br#"{"query":{"match_all":{}}}"#.as_slice())
        );
    }

    #[test]
    fn test_body_rejected_for_bodyless_verbs() {
        for method in [RestMethod::Get, RestMethod::Head, RestMethod::Delete] {
            let err = ApiRequest::new(method)
                .body(RequestBody::Json(serde_json::json!({})))
                .unwrap_err();
            assert!(matches!(err, ValidationError::BodyNotAllowed { method: m } if m == method));
        }
    }

    #[test]
    fn test_explicit_content_type_header_wins() {
        let mut request = ApiRequest::new(RestMethod::Post)
            .body(RequestBody::Json(serde_json::json!({})))
            .unwrap();
        request
            .headers
            .push(("Content-Type".to_string(), "application/vnd.custom+json".to_string()));
        assert_eq!(request.content_type(), Some("application/vnd.custom+json"));
    }

    #[test]
    fn test_ndjson_body_ends_with_newline() {
        let body = RequestBody::NdJson(vec![
            serde_json::json!({"index": {"_id": "1"}}),
            serde_json::json!({"title": "one"}),
        ]);
        let bytes = body.to_bytes().unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            "{\"index\":{\"_id\":\"1\"}}\n{\"title\":\"one\"}\n"
        );
        assert_eq!(body.content_type(), CONTENT_TYPE_NDJSON);
    }

    #[test]
    fn test_json_body_from_serialize() {
        #[derive(Serialize)]
        struct Doc {
            title: &'static str,
        }
        let body = RequestBody::json(&Doc { title: "hello" }).unwrap();
        assert_eq!(body, RequestBody::Json(serde_json::json!({"title": "hello"})));
    }
}
