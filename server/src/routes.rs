use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{Method, Uri},
    response::Html,
    Json,
};
use chrono::Utc;
use payloads::{ApiResponse, Health, Stats};
use serde_json::{json, Map, Value};
use tracing::error;
use uuid::Uuid;

use crate::{
    error::AppError,
    schema::{self, Resource, PROBE_TABLES},
    state::State as AppState,
    storage::StorageError,
    utils::RecordBody,
};

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    Path(table): Path<String>,
) -> Result<Json<ApiResponse>, AppError> {
    let resource = resolve(&table, &method, &uri)?;

    let rows = state
        .storage
        .select_all(resource.physical())
        .await
        .map_err(|e| {
            error!("GET {table} error: {e}");
            AppError::from(e)
        })?;

    let data = schema::map_response_body(resource, &Value::Array(rows));

    Ok(Json(ApiResponse::data(data)))
}

pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    Path((table, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse>, AppError> {
    let resource = resolve(&table, &method, &uri)?;

    let row = state
        .storage
        .select_one(resource.physical(), &id)
        .await
        .map_err(|e| {
            error!("GET {table} by ID error: {e}");
            AppError::from(e)
        })?;

    Ok(Json(ApiResponse::data(schema::map_response_body(
        resource, &row,
    ))))
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    Path(table): Path<String>,
    RecordBody(body): RecordBody,
) -> Result<Json<ApiResponse>, AppError> {
    let resource = resolve(&table, &method, &uri)?;

    if body.is_empty() {
        return Err(AppError::EmptyBody);
    }

    let mut record = schema::map_request_body(resource, &body);

    // Profiles are keyed by UUID and the backend does not assign one.
    if resource.physical() == "profiles" && !record.contains_key("id") {
        record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }

    schema::coerce_foreign_keys(&mut record);

    let row = state
        .storage
        .insert(resource.physical(), &record)
        .await
        .map_err(|e| {
            error!("CREATE {table} error: {e}");
            AppError::from(e)
        })?;

    Ok(Json(ApiResponse::with_message(
        schema::map_response_body(resource, &row),
        "Data berhasil ditambahkan",
    )))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    Path((table, id)): Path<(String, String)>,
    RecordBody(body): RecordBody,
) -> Result<Json<ApiResponse>, AppError> {
    let resource = resolve(&table, &method, &uri)?;

    let mut record = schema::map_request_body(resource, &body);
    schema::coerce_foreign_keys(&mut record);

    let row = state
        .storage
        .update(resource.physical(), &id, &record)
        .await
        .map_err(|e| {
            error!("UPDATE {table} ID {id} error: {e}");
            AppError::from(e)
        })?;

    Ok(Json(ApiResponse::with_message(
        schema::map_response_body(resource, &row),
        "Data berhasil diupdate",
    )))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    Path((table, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse>, AppError> {
    let resource = resolve(&table, &method, &uri)?;

    state
        .storage
        .delete(resource.physical(), &id)
        .await
        .map_err(|e| {
            error!("DELETE {table} ID {id} error: {e}");
            AppError::from(e)
        })?;

    Ok(Json(ApiResponse::message("Data berhasil dihapus")))
}

/// Best-effort schema sniff: one-row select against every known physical
/// table, reporting reachability and the sample row's key set.
pub async fn schema_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let mut report = Map::new();

    for table in PROBE_TABLES {
        let probe = match state.storage.probe(table).await {
            Ok(rows) => {
                let columns: Vec<String> = rows
                    .first()
                    .and_then(Value::as_object)
                    .map(|row| row.keys().cloned().collect())
                    .unwrap_or_default();

                json!({"exists": true, "columns": columns})
            }
            Err(_) => json!({"exists": false, "columns": []}),
        };

        report.insert(table.to_string(), probe);
    }

    Json(ApiResponse::data(Value::Object(report)))
}

/// Six independent counts joined at one barrier. A failed query degrades to
/// zero instead of failing the whole report.
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let storage = &state.storage;

    let (categories, profiles, materi, quizzes, messages, quiz_attempts) = tokio::join!(
        storage.select_all("categories"),
        storage.select_all("profiles"),
        storage.select_all("materi"),
        storage.select_all("quizzes"),
        storage.select_all("messages"),
        storage.select_all("quiz_attempts"),
    );

    let stats = Stats {
        kelas: count_or_zero(categories),
        pengguna: count_or_zero(profiles),
        materi: count_or_zero(materi),
        kuis: count_or_zero(quizzes),
        forum: count_or_zero(messages),
        pengumpulan: count_or_zero(quiz_attempts),
    };

    Json(ApiResponse::data(json!(stats)))
}

pub async fn health_handler() -> Json<Health> {
    Json(Health {
        status: "OK".to_string(),
        message: "Server EduCMS berjalan dengan baik".to_string(),
        timestamp: Utc::now(),
    })
}

pub async fn home_handler() -> Html<&'static str> {
    Html(
        "<h1 style=\"font-family: sans-serif; text-align:center; margin-top:50px;\">\
         <b>EduCMS Server Berjalan!</b><br><br>\
         <a href=\"/health\">Cek Health</a> | <a href=\"/api/kelas\">Lihat Data Kelas</a>\
         </h1>",
    )
}

pub async fn fallback_handler(method: Method, uri: Uri) -> AppError {
    AppError::UnknownRoute {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

fn resolve(table: &str, method: &Method, uri: &Uri) -> Result<Resource, AppError> {
    Resource::parse(table).ok_or_else(|| AppError::UnknownRoute {
        method: method.to_string(),
        path: uri.path().to_string(),
    })
}

fn count_or_zero(result: Result<Vec<Value>, StorageError>) -> usize {
    result.map(|rows| rows.len()).unwrap_or(0)
}
