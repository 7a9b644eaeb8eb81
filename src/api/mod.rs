// ============================================================================
// HTTP API - routes, request validation, and error-to-status mapping
// ============================================================================

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::services::{ArchiveService, PostSource};

/// How many ranked posts each request serves and archives.
const RESULT_LIMIT: usize = 10;
const MIN_TERM_LEN: usize = 1;
const MAX_TERM_LEN: usize = 100;

pub struct AppState {
    pub source: Arc<dyn PostSource>,
    pub archive: ArchiveService,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/search", get(handle_search))
        .with_state(state)
}

async fn handle_root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "X (Twitter) Top Posts API",
        "endpoints": {
            "/search": "Search for the most liked post containing a term"
        }
    }))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    search_term: String,
    most_liked_post_url: String,
    like_count: u32,
    saved_file: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

async fn handle_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let term = params.q;
    let term_len = term.chars().count();
    if term_len < MIN_TERM_LEN || term_len > MAX_TERM_LEN {
        return Err(ApiError::Validation(format!(
            "Search term must be between {} and {} characters",
            MIN_TERM_LEN, MAX_TERM_LEN
        )));
    }

    let posts = state.source.search_top(&term, RESULT_LIMIT).await?;

    if posts.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No posts found for search term: '{}'",
            term
        )));
    }

    let saved_file = state.archive.save(&term, &posts)?;
    let most_liked = &posts[0];

    Ok(Json(SearchResponse {
        most_liked_post_url: most_liked.url.clone(),
        like_count: most_liked.like_count,
        saved_file: saved_file.display().to_string(),
        search_term: term,
    }))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Configuration(_)
            | ApiError::UpstreamAuth(_)
            | ApiError::UpstreamQuery(_)
            | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
