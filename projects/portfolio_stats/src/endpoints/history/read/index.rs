use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use thiserror::Error;
use tracing::error;

use crate::db::daily_snapshot::models::HistoryEntry;
use crate::endpoints::error_response;
use crate::services::snapshot_store::GetHistoryError;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    GetHistory {
        #[from]
        source: GetHistoryError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        error!(error = %self, "GET /history failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
    }
}

/// Axum handler: GET /history
pub async fn handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, HandlerError> {
    let history: Vec<HistoryEntry> = state
        .store
        .history()
        .await?
        .into_iter()
        .map(HistoryEntry::from)
        .collect();

    Ok(Json(history))
}
