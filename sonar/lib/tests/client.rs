//! Integration tests for the client and the reqwest transport.
//!
//! These tests use wiremock to stand in for a cluster and verify the
//! requests that actually reach the wire.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use sonar_lib::endpoints::{
    Bulk, CatNodeattrs, ClusterHealth, ClusterPostVotingConfigExclusions, Get, Index, Info,
    Search,
};
use sonar_lib::{
    ApiError, ApiRequest, Client, ClientError, ConfigError, Credentials, Instrumentation,
    ReqwestTransport, Response, Transport,
};
use tracing::Span;
use url::Url;
use wiremock::matchers::{
    basic_auth, body_string, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, credentials: Credentials) -> Client {
    let transport = ReqwestTransport::builder(Url::parse(&server.uri()).unwrap())
        .credentials(credentials)
        .build()
        .unwrap();
    Client::new(Arc::new(transport))
}

/// Test that query parameters reach the server and unset ones do not.
#[tokio::test]
async fn test_nodeattrs_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_cat/nodeattrs"))
        .and(query_param("format", "json"))
        .and(query_param("h", "node,attr"))
        .and(query_param("master_timeout", "5000ms"))
        .and(query_param_is_missing("local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"node": "node-1", "attr": "zone"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Credentials::None);
    let response = client
        .send(
            CatNodeattrs::new()
                .format("json")
                .h(["node", "attr"])
                .master_timeout(Duration::from_secs(5)),
        )
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    let rows: Vec<serde_json::Value> = response.json().unwrap();
    assert_eq!(rows[0]["attr"], "zone");
}

/// Test that basic auth credentials are sent.
#[tokio::test]
async fn test_basic_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/_doc/1"))
        .and(basic_auth("elastic", "changeme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"found": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(
        &server,
        Credentials::Basic {
            username: "elastic".to_string(),
            password: "changeme".to_string(),
        },
    );
    let response = client.send(Get::new("books", "1")).await.unwrap();
    assert_eq!(response.status_code, 200);
}

/// Test that API keys use the `ApiKey` authorization scheme.
#[tokio::test]
async fn test_api_key_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_cluster/voting_config_exclusions"))
        .and(header("authorization", "ApiKey c2VjcmV0"))
        .and(query_param("node_names", "node-1,node-2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Credentials::ApiKey("c2VjcmV0".to_string()));
    let response = client
        .send(ClusterPostVotingConfigExclusions::new().node_names(["node-1", "node-2"]))
        .await
        .unwrap();
    assert_eq!(response.status_code, 200);
    assert!(response.body.is_empty());
}

/// Test that bearer tokens use the `Bearer` authorization scheme.
#[tokio::test]
async fn test_bearer_token_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_cluster/health"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "green"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Credentials::Bearer("tok-123".to_string()));
    let response = client.send(ClusterHealth::new()).await.unwrap();
    assert_eq!(response.status_code, 200);
}

/// Test that an invalid header fails locally and nothing reaches the server.
#[tokio::test]
async fn test_invalid_header_never_reaches_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, Credentials::None);
    let err = client
        .send(Info::new().header("bad header", "v"))
        .await
        .unwrap_err();

    assert!(err.is_local());
    assert!(matches!(
        err,
        ApiError::Config(ConfigError::InvalidHeader { ref name, .. }) if name == "bad header"
    ));
}

/// Test that a JSON body is sent with its content type.
#[tokio::test]
async fn test_index_sends_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/books/_doc/42"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"title":"Dune"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"result": "created"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Credentials::None);
    let response = client
        .send(Index::new("books", json!({"title": "Dune"})).id("42"))
        .await
        .unwrap();
    assert_eq!(response.status_code, 201);
}

/// Test that bulk requests are sent as newline-delimited JSON.
#[tokio::test]
async fn test_bulk_sends_ndjson() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/books/_bulk"))
        .and(header("content-type", "application/x-ndjson"))
        .and(body_string(
            "{\"index\":{\"_id\":\"1\"}}\n{\"title\":\"Dune\"}\n",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errors": false})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Credentials::None);
    let response = client
        .send(
            Bulk::new()
                .index("books")
                .operation(json!({"index": {"_id": "1"}}))
                .operation(json!({"title": "Dune"})),
        )
        .await
        .unwrap();
    assert_eq!(response.status_code, 200);
}

/// Test that error statuses come back as data, with the body intact.
#[tokio::test]
async fn test_not_found_is_returned_as_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books/_doc/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("warning", "299 Elasticsearch \"deprecated field\"")
                .set_body_json(json!({"found": false})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Credentials::None);
    let response = client.send(Get::new("books", "missing")).await.unwrap();

    assert_eq!(response.status_code, 404);
    assert!(response.is_error());
    assert_eq!(response.warnings().len(), 1);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["found"], false);

    let err = response.error_for_status().unwrap_err();
    assert!(matches!(
        err,
        ApiError::Client(ClientError::HttpStatus { status: 404, .. })
    ));
}

/// Test that a slow server produces a timeout error.
#[tokio::test]
async fn test_transport_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_search"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::builder(Url::parse(&server.uri()).unwrap())
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let client = Client::new(Arc::new(transport));

    let err = client.send(Search::new()).await.unwrap_err();
    match err {
        ApiError::Client(e) => {
            assert!(matches!(e, ClientError::Timeout { duration_ms: 50 }));
            assert!(e.is_retryable());
        }
        other => panic!("expected a client error, got {other:?}"),
    }
}

/// Records every hook invocation in order.
#[derive(Debug, Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Instrumentation for Recorder {
    fn start(&self, endpoint: &'static str) -> Span {
        self.push(format!("start:{endpoint}"));
        Span::none()
    }

    fn close(&self, _span: Span) {
        self.push("close");
    }

    fn record_error(&self, _span: &Span, error: &ApiError) {
        let kind = if error.is_local() { "local" } else { "transport" };
        self.push(format!("error:{kind}"));
    }

    fn record_path_part(&self, _span: &Span, name: &str, value: &str) {
        self.push(format!("path:{name}={value}"));
    }

    fn record_request_body(&self, _span: &Span, endpoint: &str, body: &[u8]) {
        self.push(format!("body:{endpoint}:{}", body.len()));
    }

    fn before_request(&self, _span: &Span, request: &ApiRequest, _endpoint: &str) {
        self.push(format!("before:{} {}", request.method, request.path_string()));
    }

    fn after_request(
        &self,
        _span: &Span,
        _request: &ApiRequest,
        response: Option<&Response>,
        _endpoint: &str,
    ) {
        match response {
            Some(response) => self.push(format!("after:{}", response.status_code)),
            None => self.push("after:none"),
        }
    }
}

/// Returns a canned result without touching the network.
#[derive(Debug)]
struct StubTransport {
    fail: bool,
    calls: Mutex<usize>,
}

impl StubTransport {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn perform(&self, _request: &ApiRequest) -> Result<Response, ClientError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(ClientError::Connection("connection refused".to_string()));
        }
        Ok(Response::new(200, Default::default(), "{}"))
    }
}

/// Test the hook order for a successful call with a body.
#[tokio::test]
async fn test_instrumentation_order_on_success() {
    let recorder = Arc::new(Recorder::default());
    let client =
        Client::new(Arc::new(StubTransport::new(false))).with_instrumentation(recorder.clone());

    client
        .send(Search::new().index(["books"]).body(json!({"size": 0})))
        .await
        .unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            "start:search",
            "path:index=books",
            "body:search:10",
            "before:POST /books/_search",
            "after:200",
            "close",
        ]
    );
}

/// Test that a transport error is passed through and recorded.
#[tokio::test]
async fn test_transport_error_passes_through() {
    let recorder = Arc::new(Recorder::default());
    let client =
        Client::new(Arc::new(StubTransport::new(true))).with_instrumentation(recorder.clone());

    let err = client.send(Get::new("books", "1")).await.unwrap_err();
    match &err {
        ApiError::Client(ClientError::Connection(message)) => {
            assert_eq!(message, "connection refused");
        }
        other => panic!("expected the transport's error, got {other:?}"),
    }

    assert_eq!(
        recorder.events(),
        vec![
            "start:get",
            "path:index=books",
            "path:id=1",
            "before:GET /books/_doc/1",
            "after:none",
            "error:transport",
            "close",
        ]
    );
}

/// Test that an invalid header is reported as a local error.
#[tokio::test]
async fn test_invalid_header_is_local_error() {
    let recorder = Arc::new(Recorder::default());
    let transport = Arc::new(StubTransport::new(false));
    let client = Client::new(transport.clone()).with_instrumentation(recorder.clone());

    let err = client
        .send(Info::new().header("X-Opaque-Id", "line\nbreak"))
        .await
        .unwrap_err();
    assert!(err.is_local());
    assert_eq!(*transport.calls.lock().unwrap(), 0);
    assert_eq!(recorder.events(), vec!["start:info", "error:local", "close"]);
}

/// Test that a request that cannot be built never reaches the transport.
#[tokio::test]
async fn test_local_error_never_reaches_transport() {
    let recorder = Arc::new(Recorder::default());
    let transport = Arc::new(StubTransport::new(false));
    let client = Client::new(transport.clone()).with_instrumentation(recorder.clone());

    let err = client.send(Get::new("", "1")).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Config(ConfigError::MissingPathParam {
            endpoint: "get",
            param: "index"
        })
    ));
    assert_eq!(*transport.calls.lock().unwrap(), 0);
    assert_eq!(recorder.events(), vec!["start:get", "error:local", "close"]);
}
