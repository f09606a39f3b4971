use axum::{routing::get, Extension, Router};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::endpoints::{
    history::read::index::handler as history_read_handler,
    root::read::index::handler as root_read_handler,
    stats::read::index::handler as stats_read_handler,
};
use crate::state::AppState;

/// Any origin, method and header, with credentials. Browsers reject a literal
/// `*` alongside credentials, so the request's values are echoed back instead.
pub fn open_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_read_handler))
        .route("/stats", get(stats_read_handler))
        .route("/history", get(history_read_handler))
        .layer(Extension(state))
        .layer(open_cors())
        .layer(TraceLayer::new_for_http())
}
