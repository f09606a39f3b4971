use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use thiserror::Error;
use tracing::error;

use crate::endpoints::error_response;
use crate::services::aggregator::{GetAllStatsError, StatsResult};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    GetAllStats {
        #[from]
        source: GetAllStatsError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        error!(error = %self, "GET /stats failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
    }
}

/// Axum handler: GET /stats
pub async fn handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<StatsResult>, HandlerError> {
    let stats = state.aggregator.get_all_stats().await?;

    Ok(Json(stats))
}
