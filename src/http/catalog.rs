use axum::{
    extract::{Query, State},
    Json,
};

use crate::catalog::{count_files, filter_tree, FilterCriteria, FilterOptions, MediaNode};
use crate::http::state::AppState;

/// GET /media_info.json — the document exactly as loaded.
pub async fn serve_document(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.document.as_ref().clone())
}

/// GET /api/options — distinct values per filter dimension.
pub async fn serve_options(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(state.options.as_ref().clone())
}

/// GET /api/catalog?videoCodec=..&audioCodec=..&audioChannels=..&videoResolution=..
///
/// Always filters the original catalog; missing or blank parameters leave
/// that dimension unconstrained.
pub async fn serve_filtered(
    State(state): State<AppState>,
    Query(criteria): Query<FilterCriteria>,
) -> Json<Vec<MediaNode>> {
    let filtered = filter_tree(&state.catalog, &criteria);
    tracing::debug!(
        "filter {:?} kept {} of {} files",
        criteria,
        count_files(&filtered),
        count_files(&state.catalog)
    );
    Json(filtered)
}
