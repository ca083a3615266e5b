//! Catalogue page API handler.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use reelfeed_core::{CollectionError, OutputRecord, PageRequest};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Serve one page of enriched catalogue records.
///
/// `GET /api/v1/collection?page=2&page_size=20`
pub async fn get_collection(
    State(state): State<Arc<AppState>>,
    Query(request): Query<PageRequest>,
) -> Result<Json<Vec<OutputRecord>>, (StatusCode, Json<ErrorResponse>)> {
    match state.pager().get_page(request).await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            warn!(error = %e, "Collection page request failed");
            Err((
                error_status(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

fn error_status(error: &CollectionError) -> StatusCode {
    match error {
        CollectionError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
        CollectionError::Fetch(_) => StatusCode::BAD_GATEWAY,
    }
}
