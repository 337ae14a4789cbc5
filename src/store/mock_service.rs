//! Mock expense service for the HTTP store tests.
//!
//! Serves the same routes as the real service from an in-memory record list
//! and keeps every request it received. The blocking client must not run on
//! a runtime thread, so the server gets its own runtime and tests call it
//! from the plain test thread.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Path, Query, Request, State},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

/// One request as the service saw it.
#[derive(Debug, Clone)]
pub(crate) struct Received {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) content_type: Option<String>,
    pub(crate) body: String,
}

#[derive(Default)]
struct ServiceState {
    records: Mutex<Vec<Value>>,
    received: Mutex<Vec<Received>>,
    scripted: Mutex<Option<(StatusCode, String)>>,
}

pub(crate) struct MockExpenseService {
    addr: SocketAddr,
    state: Arc<ServiceState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    // Declared last: dropped after the shutdown signal, taking the server with it
    _runtime: Runtime,
}

impl MockExpenseService {
    /// Start the service on an available port, seeded with `records`.
    pub(crate) fn start(records: Vec<Value>) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();

        let state = Arc::new(ServiceState {
            records: Mutex::new(records),
            ..ServiceState::default()
        });

        let app = Router::new()
            .route("/api/expenses", get(list_expenses).post(create_expense))
            .route("/api/expenses/total", get(total))
            .route("/api/expenses/:id", put(update_expense).delete(delete_expense))
            .route("/actuator/health", get(health))
            .layer(middleware::from_fn_with_state(
                Arc::clone(&state),
                record_request,
            ))
            .with_state(Arc::clone(&state));

        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        runtime.spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            _runtime: runtime,
        }
    }

    pub(crate) fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer the next request with `status` and `body` instead of routing it.
    pub(crate) fn respond_next(&self, status: StatusCode, body: &str) {
        *self.state.scripted.lock().unwrap() = Some((status, body.to_string()));
    }

    pub(crate) fn received(&self) -> Vec<Received> {
        self.state.received.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> Received {
        self.received().pop().unwrap()
    }

    pub(crate) fn records(&self) -> Vec<Value> {
        self.state.records.lock().unwrap().clone()
    }

    pub(crate) fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockExpenseService {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Keep a copy of every request, and short-circuit it when a response has
/// been scripted.
async fn record_request(
    State(state): State<Arc<ServiceState>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    state.received.lock().unwrap().push(Received {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        content_type: parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });

    let scripted = state.scripted.lock().unwrap().take();
    if let Some((status, body)) = scripted {
        return (status, [(header::CONTENT_TYPE, "application/json")], body).into_response();
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeParams {
    start_date: Option<String>,
    end_date: Option<String>,
}

/// Like the real service, only a fully bounded range filters.
fn in_range(record: &Value, params: &RangeParams) -> bool {
    match (&params.start_date, &params.end_date) {
        (Some(start), Some(end)) => record["date"]
            .as_str()
            .is_some_and(|d| d >= start.as_str() && d <= end.as_str()),
        _ => true,
    }
}

async fn list_expenses(
    State(state): State<Arc<ServiceState>>,
    Query(params): Query<RangeParams>,
) -> Json<Vec<Value>> {
    let records = state.records.lock().unwrap();
    Json(
        records
            .iter()
            .filter(|r| in_range(r, &params))
            .cloned()
            .collect(),
    )
}

async fn create_expense(
    State(state): State<Arc<ServiceState>>,
    Json(mut body): Json<Value>,
) -> Json<Value> {
    let mut records = state.records.lock().unwrap();
    let id = records
        .iter()
        .filter_map(|r| r["id"].as_i64())
        .max()
        .unwrap_or(0)
        + 1;
    body["id"] = json!(id);
    records.push(body.clone());
    Json(body)
}

async fn update_expense(
    State(state): State<Arc<ServiceState>>,
    Path(id): Path<i64>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut records = state.records.lock().unwrap();
    match records.iter_mut().find(|r| r["id"] == id) {
        Some(record) => {
            body["id"] = json!(id);
            *record = body.clone();
            Json(body).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Expense not found" })),
        )
            .into_response(),
    }
}

async fn delete_expense(
    State(state): State<Arc<ServiceState>>,
    Path(id): Path<i64>,
) -> Json<Value> {
    let mut records = state.records.lock().unwrap();
    let before = records.len();
    records.retain(|r| r["id"] != id);
    Json(json!({ "deleted": records.len() != before }))
}

async fn total(
    State(state): State<Arc<ServiceState>>,
    Query(params): Query<RangeParams>,
) -> Json<f64> {
    let records = state.records.lock().unwrap();
    Json(
        records
            .iter()
            .filter(|r| in_range(r, &params))
            .filter_map(|r| r["amount"].as_f64())
            .sum(),
    )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}
