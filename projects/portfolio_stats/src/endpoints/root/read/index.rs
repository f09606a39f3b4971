use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    message: &'static str,
}

/// Axum handler: GET /
pub async fn handler() -> Json<RootResponse> {
    Json(RootResponse { message: "Portfolio API is running!" })
}
