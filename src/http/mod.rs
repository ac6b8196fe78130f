pub mod catalog;
pub mod state;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use crate::http::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/media_info.json", get(catalog::serve_document))
        .route("/api/options", get(catalog::serve_options))
        .route("/api/catalog", get(catalog::serve_filtered))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
