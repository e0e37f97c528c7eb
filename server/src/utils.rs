use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Flat record extracted from either a JSON or a multipart request body.
///
/// Multipart text fields arrive as strings; foreign key re-typing happens
/// later in the router. File parts are drained and dropped, there is no
/// upload storage behind this server.
pub struct RecordBody(pub Map<String, Value>);

impl<S> FromRequest<S> for RecordBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            return parse_multipart(req, state).await;
        }

        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|_| AppError::EmptyBody)?;

        match value {
            Value::Object(record) => Ok(Self(record)),
            Value::Null => Ok(Self(Map::new())),
            _ => Err(AppError::EmptyBody),
        }
    }
}

async fn parse_multipart<S>(req: Request, state: &S) -> Result<RecordBody, AppError>
where
    S: Send + Sync,
{
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|_| AppError::EmptyBody)?;

    let mut record = Map::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::EmptyBody)?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if field.file_name().is_some() {
            // Drain the part so the stream can move on.
            field.bytes().await.map_err(|_| AppError::EmptyBody)?;
            continue;
        }

        let text = field.text().await.map_err(|_| AppError::EmptyBody)?;
        record.insert(name, Value::String(text));
    }

    Ok(RecordBody(record))
}
