//! In-process mock of the Jaffle Shop API
//!
//! Serves every path under `/api/v1` from a responder closure and records
//! each request's endpoint and paging parameters, so tests can assert on the
//! exact sequence of pages fetched.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::JaffleShopConfig;

/// Path prefix the mock serves, mirroring the real API root
pub const MOCK_API_PREFIX: &str = "/api/v1";

/// What the mock answers for one request
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 200 with a JSON body
    Json(Value),
    /// Bare status code, empty body
    Status(u16),
    /// 200 with a raw (possibly invalid JSON) body
    Body(String),
}

/// One request as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    pub endpoint: String,
    pub page: u32,
    pub limit: u32,
}

type Responder = Arc<dyn Fn(&str, u32) -> MockResponse + Send + Sync>;

#[derive(Clone)]
struct MockState {
    responder: Responder,
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

#[derive(Deserialize)]
struct PageQuery {
    page: u32,
    limit: u32,
}

/// Running mock API; shut down on drop
pub struct MockApi {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<MockRequest>>>,
    handle: JoinHandle<()>,
}

impl MockApi {
    /// Start a mock answering `(endpoint, page)` with `responder`
    ///
    /// `endpoint` is the path with the `/api/v1` prefix removed, e.g. `/orders`.
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&str, u32) -> MockResponse + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            responder: Arc::new(responder),
            requests: Arc::clone(&requests),
        };

        let app = Router::new().fallback(handle_request).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock api");
        let addr = listener.local_addr().expect("failed to get addr");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// Base URL to configure a source with
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, MOCK_API_PREFIX)
    }

    /// Source config pointing at this mock
    pub fn config(&self) -> JaffleShopConfig {
        JaffleShopConfig::with_base_url(self.base_url())
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    /// Pages requested for one endpoint, in arrival order
    pub fn pages(&self, endpoint: &str) -> Vec<u32> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .map(|r| r.page)
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_request(
    State(state): State<MockState>,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let path = uri.path();
    let endpoint = path.strip_prefix(MOCK_API_PREFIX).unwrap_or(path).to_string();

    state.requests.lock().push(MockRequest {
        endpoint: endpoint.clone(),
        page: query.page,
        limit: query.limit,
    });

    match (state.responder)(&endpoint, query.page) {
        MockResponse::Json(body) => axum::Json(body).into_response(),
        MockResponse::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        MockResponse::Body(body) => body.into_response(),
    }
}

/// `count` records shaped like the endpoint's entities, ids from `first_id`
pub fn records(endpoint: &str, first_id: u64, count: usize) -> Vec<Value> {
    (0..count as u64)
        .map(|offset| {
            let id = first_id + offset;
            match endpoint {
                "/orders" => json!({"id": id, "customer_id": id % 7, "amount": id * 100}),
                "/products" => json!({"id": id, "name": format!("product_{id}"), "price": 4.5}),
                _ => json!({"id": id, "name": format!("customer_{id}")}),
            }
        })
        .collect()
}

/// Responder serving `pages` full pages of `per_page` records per endpoint,
/// then an empty list
pub fn paged(pages: u32, per_page: usize) -> impl Fn(&str, u32) -> MockResponse + Send + Sync {
    move |endpoint, page| {
        if page > pages {
            return MockResponse::Json(json!([]));
        }
        let first_id = u64::from(page - 1) * per_page as u64 + 1;
        MockResponse::Json(Value::Array(records(endpoint, first_id, per_page)))
    }
}

/// Base URL whose port refuses connections
pub fn unreachable_base_url() -> String {
    let listener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind placeholder listener");
    let addr = listener.local_addr().expect("failed to get addr");
    drop(listener);
    format!("http://{}{}", addr, MOCK_API_PREFIX)
}
