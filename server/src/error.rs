use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use payloads::ApiResponse;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Request body kosong")]
    EmptyBody,

    #[error("{method} {path} not found")]
    UnknownRoute { method: String, path: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::EmptyBody => StatusCode::BAD_REQUEST,
            AppError::UnknownRoute { .. } => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ApiResponse::error(self.to_string()))).into_response()
    }
}
