//! Route handlers and shared request plumbing.

pub mod catalog;
pub mod medals;
pub mod records;
pub mod submissions;
pub mod totals;

use std::collections::HashSet;
use std::sync::Arc;

use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::engine;
use crate::models::{CategoryConfig, Direction, Level, RecordType, Submission};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Everything a board handler needs for one (game, category, record type).
pub(crate) struct BoardContext {
    pub category: CategoryConfig,
    /// The category's levels, in display order.
    pub levels: Vec<Level>,
    /// Normalized submissions of the requested record type, restricted to
    /// the category's levels.
    pub submissions: Vec<Submission>,
    pub direction: Direction,
}

/// Fetch the normalized submission set for a game and record type, through
/// the cache. The cached set is immutable and shared; a stale entry only
/// disappears via whole-game invalidation after moderation.
pub(crate) async fn game_submissions(
    state: &AppState,
    game: &str,
    record_type: RecordType,
) -> Result<Arc<Vec<Submission>>, ApiError> {
    if let Some(cached) = state.cache.get(game, record_type).await {
        return Ok(cached);
    }

    let rows = state.source.fetch_submissions(game, record_type).await?;
    let profiles = state.source.fetch_profiles(game).await?;
    let levels = state.source.fetch_levels(game).await?;

    let report = match record_type {
        RecordType::Score => engine::normalize(&rows, &[], &profiles, &levels),
        RecordType::Time => engine::normalize(&[], &rows, &profiles, &levels),
    };
    if !report.is_clean() {
        tracing::warn!(
            %game,
            %record_type,
            dropped = report.dropped.len(),
            "normalization dropped submissions"
        );
    }

    let submissions = Arc::new(report.submissions);
    state
        .cache
        .insert(game, record_type, submissions.clone())
        .await;
    Ok(submissions)
}

/// Resolve a category and assemble its submission set.
pub(crate) async fn board_context(
    state: &AppState,
    game: &str,
    category_id: &str,
    record_type: RecordType,
) -> Result<BoardContext, ApiError> {
    let categories = state.source.fetch_categories(game).await?;
    let category = categories
        .into_iter()
        .find(|c| c.id.as_str() == category_id)
        .ok_or_else(|| ApiError::NotFound(format!("category {category_id} in game {game}")))?;

    let levels: Vec<Level> = state
        .source
        .fetch_levels(game)
        .await?
        .into_iter()
        .filter(|l| l.misc == category.misc)
        .collect();

    let level_ids: HashSet<String> = levels.iter().map(|l| l.id.as_str().to_string()).collect();
    let submissions = game_submissions(state, game, record_type)
        .await?
        .iter()
        .filter(|s| level_ids.contains(s.level.id.as_str()))
        .cloned()
        .collect();

    let direction = category.direction(record_type);

    Ok(BoardContext {
        category,
        levels,
        submissions,
        direction,
    })
}
