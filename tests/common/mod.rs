//! In-process mock of the HCB API for integration tests.
//!
//! Responses are scripted per method and path (optionally per exact query
//! string). Every request that reaches the server is recorded.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use hcb_rs::{ClientConfig, HcbClient, OAuthCredentials, Session};

static INIT: Once = Once::new();

/// Initialize logging for tests
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// The body decoded as JSON (`Null` if it is not JSON).
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone)]
struct ScriptedResponse {
    method: Method,
    path: String,
    query: Option<String>,
    status: StatusCode,
    body: Value,
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<Mutex<Vec<ScriptedResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockServer {
    pub base_url: String,
    state: MockState,
}

impl MockServer {
    pub async fn start() -> Self {
        init_logging();

        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Script a response for `method path`, whatever the query string.
    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) {
        self.script(method, path, None, status, body);
    }

    /// Script a response for `method path?query` with this exact query.
    pub fn on_query(&self, method: Method, path: &str, query: &str, status: u16, body: Value) {
        self.script(method, path, Some(query.to_string()), status, body);
    }

    fn script(&self, method: Method, path: &str, query: Option<String>, status: u16, body: Value) {
        self.state.routes.lock().unwrap().push(ScriptedResponse {
            method,
            path: path.to_string(),
            query,
            status: StatusCode::from_u16(status).unwrap(),
            body,
        });
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests received for one path.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::default().with_base_url(&self.base_url)
    }

    /// A client with a static token pointed at this server.
    pub fn client(&self) -> HcbClient {
        HcbClient::with_session(Session::new("test_token"), self.config()).unwrap()
    }

    /// A client with refreshable credentials pointed at this server.
    pub fn oauth_client(&self, credentials: OAuthCredentials) -> HcbClient {
        HcbClient::from_credentials_with_config(credentials, self.config()).unwrap()
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };

    let path = uri.path().to_string();
    let query = uri.query().map(String::from);

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: query.clone(),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let routes = state.routes.lock().unwrap();
    let same_route = |r: &&ScriptedResponse| r.method == method && r.path == path;
    let exact = routes
        .iter()
        .filter(same_route)
        .find(|r| r.query.is_some() && r.query == query);
    let any_query = routes
        .iter()
        .filter(same_route)
        .find(|r| r.query.is_none());

    match exact.or(any_query) {
        Some(route) => (route.status, Json(route.body.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "messages": [format!("No scripted response for {} {}", method, path)],
            })),
        )
            .into_response(),
    }
}
