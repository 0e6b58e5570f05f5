//! Common test utilities for integration tests
//!
//! Contains a recording mock transport, a mock exchange HTTP server, and
//! sample responses shaped like the exchange's GraphQL API.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::any;
use axum::Router;
use bitlum_client::{BitlumClient, ClientError, ClientResult, Request, Transport};
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Hex encoded macaroon issued by the exchange
pub const EXCHANGE_MACAROON: &str = "0201066269746c756d0204811f79090002166469736f70732069737375655f6170695f746f6b656e00020f7573657220323136363332333436350000062023ffa8c3ba9fa8a8cda6171a313fcfdfc98b52410f03685c448583cf1be01d04";

/// Body the server sends when it cannot parse a request
pub const INVALID_ENVELOPE: &str = r#"{ "errors": 123, "data": "qwerty" }"#;

/// Body with a single exchange error and no data
pub const EXCHANGE_ERROR: &str = r#"{ "errors": [{ "message": "some error" }] }"#;

/// Sample accounts response with an error for one of the requested assets
pub const PARTIAL_ACCOUNTS: &str = r#"{
    "errors": [{
        "message": "asset DASH is not supported",
        "locations": [{"line": 3, "column": 5}]
    }],
    "data": {
        "accounts": [{
            "asset": "BTC",
            "address": "2N1SP7r92ZZJvYKG2oNtzPwYnzw62up7mTo",
            "available": "0.5",
            "estimation": "0.5",
            "freezed": "0.1",
            "pending": {"amount": "0", "transactions": null}
        }]
    }
}"#;

// =============================================================================
// Mock transport
// =============================================================================

/// A request seen by [`MockTransport`]
#[derive(Debug, Clone)]
pub struct Call {
    pub authenticated: bool,
    pub request: Request,
}

/// Transport returning a canned response and recording every request
#[derive(Debug)]
pub struct MockTransport {
    response: Result<String, StatusCode>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    /// Respond to every request with `body`
    pub fn responding(body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(body.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Fail every request with `status`
    pub fn failing(status: StatusCode) -> Arc<Self> {
        Arc::new(Self {
            response: Err(status),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// The only request sent so far
    pub fn single_call(&self) -> Call {
        let calls = self.calls.lock();
        assert_eq!(calls.len(), 1, "expected exactly one request");
        calls[0].clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, authenticated: bool, request: &Request) -> ClientResult<Vec<u8>> {
        self.calls.lock().push(Call {
            authenticated,
            request: request.clone(),
        });

        match &self.response {
            Ok(body) => Ok(body.clone().into_bytes()),
            Err(status) => Err(ClientError::HttpStatus { status: *status }),
        }
    }
}

/// Client on top of a mock transport
pub fn mock_client(transport: &Arc<MockTransport>) -> BitlumClient {
    BitlumClient::with_transport(transport.clone())
}

// =============================================================================
// Mock exchange server
// =============================================================================

/// A request received by [`MockExchange`]
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Local HTTP server standing in for the exchange
///
/// `POST /query` answers with the configured status and body. `/moved`
/// always redirects to `/query`. `/truncated` answers 200 and then breaks
/// the connection halfway through the body.
pub struct MockExchange {
    addr: std::net::SocketAddr,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockExchange {
    pub async fn start(status: StatusCode, body: &str) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            status,
            body: body.to_string(),
            captured: captured.clone(),
        };

        let app = Router::new()
            .route("/query", any(respond))
            .route("/moved", any(redirect))
            .route("/truncated", any(truncated))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            captured,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/query", self.addr)
    }

    pub fn moved_url(&self) -> String {
        format!("http://{}/moved", self.addr)
    }

    pub fn truncated_url(&self) -> String {
        format!("http://{}/truncated", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().clone()
    }

    /// The only request received so far
    pub fn single_request(&self) -> CapturedRequest {
        let requests = self.captured.lock();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].clone()
    }
}

impl Drop for MockExchange {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.captured.lock().push(CapturedRequest {
        method,
        path: uri.path().to_string(),
        headers,
        body,
    });

    (state.status, state.body)
}

async fn redirect(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.captured.lock().push(CapturedRequest {
        method,
        path: uri.path().to_string(),
        headers,
        body,
    });

    (StatusCode::MOVED_PERMANENTLY, [(LOCATION, "/query")])
}

async fn truncated() -> impl IntoResponse {
    let head = stream::iter([Ok::<_, std::io::Error>(Bytes::from_static(b"{\"data\": {"))]);
    // Give the server time to flush the head before the body fails
    let cut = stream::once(async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "body cut short",
        ))
    });

    (StatusCode::OK, Body::from_stream(head.chain(cut)))
}

/// URL nothing is listening on
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/query", addr)
}
