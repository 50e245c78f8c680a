//! REST API endpoints.
//!
//! Axum-based HTTP API serving board views (world records, medals, totals),
//! submission listings, and moderation actions.

pub mod routes;
pub mod state;

use axum::routing::{delete, get, post};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::source::SourceError;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        ApiError::Internal(format!("submission source failed: {err}"))
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(format!("storage failed: {err}"))
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Pagination parameters.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(50).clamp(1, 200),
        }
    }

    pub fn offset(&self) -> usize {
        ((self.page - 1) * self.page_size) as usize
    }
}

/// Pagination metadata in responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u32) -> Self {
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages: total_items.div_ceil(pagination.page_size),
        }
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/games", get(routes::catalog::list_games))
        .route(
            "/api/games/:game/categories",
            get(routes::catalog::list_categories),
        )
        .route(
            "/api/games/:game/categories/:category/levels",
            get(routes::catalog::list_levels),
        )
        .route(
            "/api/games/:game/categories/:category/levels/:level/records",
            get(routes::records::level_records),
        )
        .route(
            "/api/games/:game/categories/:category/medals",
            get(routes::medals::medal_table),
        )
        .route(
            "/api/games/:game/categories/:category/totals",
            get(routes::totals::totalizer),
        )
        .route(
            "/api/games/:game/submissions",
            get(routes::submissions::list),
        )
        .route(
            "/api/games/:game/submissions/:id/approve",
            post(routes::submissions::approve),
        )
        .route(
            "/api/games/:game/submissions/:id",
            delete(routes::submissions::remove),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
