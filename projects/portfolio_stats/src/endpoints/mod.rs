pub mod history;
pub mod root;
pub mod stats;

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;

/// Error body shared by every endpoint: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

pub fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorDetail { detail })).into_response()
}
