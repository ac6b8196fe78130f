use std::path::Path;
use std::sync::Arc;

use crate::catalog::{extract_options, parse_document, DocumentError, FilterOptions, MediaNode};

/// Shared application state injected into all route handlers via axum::extract::State.
/// The catalog is loaded once and never mutated, so plain Arcs suffice.
#[derive(Clone)]
pub struct AppState {
    /// The document as it was read, including entries and ffprobe fields
    /// the catalog model does not keep.
    pub document: Arc<serde_json::Value>,
    pub catalog: Arc<Vec<MediaNode>>,
    /// Extracted once from `catalog` when the document is loaded.
    pub options: Arc<FilterOptions>,
}

impl AppState {
    pub fn from_document(json: &str) -> Result<Self, DocumentError> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        let catalog = parse_document(json)?;
        let options = extract_options(&catalog);
        Ok(AppState {
            document: Arc::new(document),
            catalog: Arc::new(catalog),
            options: Arc::new(options),
        })
    }

    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_document(&content)
    }
}
