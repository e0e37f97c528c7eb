//! In-memory PostgREST stand-in plus a ready-to-use proxy server.
//!
//! The mock stores rows exactly as they were sent, so any type coercion
//! observed in responses was done by the proxy, not here. It honors the
//! subset of PostgREST the storage client speaks: `id=eq.{v}` filters,
//! `limit`, the single-object `Accept` header, and minimal-return deletes.

use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Path, Query, State},
    http::{header::ACCEPT, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_test::TestServer;
use educms::{config::Config, state::State as AppState};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Default)]
pub struct MockState {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    failing: Mutex<HashSet<String>>,
    next_id: Mutex<i64>,
    calls: Mutex<usize>,
}

pub struct MockSupabase {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockSupabase {
    pub fn create_table(&self, table: &str) {
        self.state
            .tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default();
    }

    pub fn seed(&self, table: &str, row: Value) {
        self.state
            .tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    /// Make every request against `table` fail with a 500.
    pub fn fail(&self, table: &str) {
        self.state.failing.lock().unwrap().insert(table.to_string());
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state
            .tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        *self.state.calls.lock().unwrap()
    }
}

pub async fn spawn_mock() -> MockSupabase {
    let state = Arc::new(MockState::default());

    let app = Router::new()
        .route(
            "/rest/v1/{table}",
            get(select)
                .post(insert)
                .patch(update)
                .delete(delete_rows),
        )
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockSupabase { addr, state }
}

/// The proxy under test, wired to a fresh mock backend.
pub async fn test_server() -> (TestServer, MockSupabase) {
    let mock = spawn_mock().await;

    let config = Config {
        port: 0,
        supabase_url: format!("http://{}", mock.addr),
        supabase_key: "test-key".to_string(),
    };

    let server = TestServer::new(educms::app(AppState::from_config(config))).unwrap();

    (server, mock)
}

type Params = Query<HashMap<String, String>>;

fn wants_object(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("vnd.pgrst.object"))
}

fn pgrst_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"message": message, "code": "PGRST"}))).into_response()
}

fn id_matches(row: &Value, target: &str) -> bool {
    match row.get("id") {
        Some(Value::Number(n)) => n.to_string() == target,
        Some(Value::String(s)) => s == target,
        _ => false,
    }
}

fn guard(state: &MockState, table: &str) -> Option<Response> {
    *state.calls.lock().unwrap() += 1;

    if state.failing.lock().unwrap().contains(table) {
        return Some(pgrst_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "mock failure",
        ));
    }

    if !state.tables.lock().unwrap().contains_key(table) {
        return Some(pgrst_error(
            StatusCode::NOT_FOUND,
            &format!("relation \"public.{table}\" does not exist"),
        ));
    }

    None
}

async fn select(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    Query(params): Params,
    headers: HeaderMap,
) -> Response {
    if let Some(rejection) = guard(&state, &table) {
        return rejection;
    }

    let tables = state.tables.lock().unwrap();
    let mut rows: Vec<Value> = tables.get(&table).cloned().unwrap_or_default();

    if let Some(target) = params.get("id").and_then(|f| f.strip_prefix("eq.")) {
        rows.retain(|row| id_matches(row, target));
    }

    if let Some(limit) = params.get("limit").and_then(|l| l.parse::<usize>().ok()) {
        rows.truncate(limit);
    }

    if wants_object(&headers) {
        if rows.len() != 1 {
            return pgrst_error(
                StatusCode::NOT_ACCEPTABLE,
                "JSON object requested, multiple (or no) rows returned",
            );
        }

        return Json(rows.remove(0)).into_response();
    }

    Json(Value::Array(rows)).into_response()
}

async fn insert(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(rejection) = guard(&state, &table) {
        return rejection;
    }

    let Value::Object(mut row) = body else {
        return pgrst_error(StatusCode::BAD_REQUEST, "expected a JSON object");
    };

    if !row.contains_key("id") {
        let mut next_id = state.next_id.lock().unwrap();
        *next_id += 1;
        row.insert("id".to_string(), json!(*next_id));
    }

    let row = Value::Object(row);
    state
        .tables
        .lock()
        .unwrap()
        .get_mut(&table)
        .unwrap()
        .push(row.clone());

    if wants_object(&headers) {
        return (StatusCode::CREATED, Json(row)).into_response();
    }

    (StatusCode::CREATED, Json(json!([row]))).into_response()
}

async fn update(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    Query(params): Params,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(rejection) = guard(&state, &table) {
        return rejection;
    }

    let Some(target) = params
        .get("id")
        .and_then(|f| f.strip_prefix("eq."))
        .map(str::to_string)
    else {
        return pgrst_error(StatusCode::BAD_REQUEST, "missing id filter");
    };

    let Value::Object(patch) = body else {
        return pgrst_error(StatusCode::BAD_REQUEST, "expected a JSON object");
    };

    let mut tables = state.tables.lock().unwrap();
    let rows = tables.get_mut(&table).unwrap();

    let mut updated = Vec::new();
    for row in rows.iter_mut() {
        if id_matches(row, &target) {
            let fields = row.as_object_mut().unwrap();
            for (key, value) in &patch {
                fields.insert(key.clone(), value.clone());
            }
            updated.push(row.clone());
        }
    }

    if wants_object(&headers) {
        if updated.len() != 1 {
            return pgrst_error(
                StatusCode::NOT_ACCEPTABLE,
                "JSON object requested, multiple (or no) rows returned",
            );
        }

        return Json(updated.remove(0)).into_response();
    }

    Json(Value::Array(updated)).into_response()
}

async fn delete_rows(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    Query(params): Params,
) -> Response {
    if let Some(rejection) = guard(&state, &table) {
        return rejection;
    }

    if let Some(target) = params.get("id").and_then(|f| f.strip_prefix("eq.")) {
        state
            .tables
            .lock()
            .unwrap()
            .get_mut(&table)
            .unwrap()
            .retain(|row| !id_matches(row, target));
    }

    StatusCode::NO_CONTENT.into_response()
}
