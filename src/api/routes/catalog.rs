//! Game, category, and level listings.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{CategoryConfig, Level};

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<String>,
}

pub async fn list_games(State(state): State<AppState>) -> Result<Json<GamesResponse>, ApiError> {
    let games = state.storage.list_games()?;
    Ok(Json(GamesResponse { games }))
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryConfig>,
}

pub async fn list_categories(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let categories = state.source.fetch_categories(&game).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound(format!("game {game}")));
    }
    Ok(Json(CategoriesResponse { categories }))
}

#[derive(Debug, Serialize)]
pub struct LevelsResponse {
    pub category: CategoryConfig,
    pub levels: Vec<Level>,
}

pub async fn list_levels(
    State(state): State<AppState>,
    Path((game, category_id)): Path<(String, String)>,
) -> Result<Json<LevelsResponse>, ApiError> {
    let categories = state.source.fetch_categories(&game).await?;
    let category = categories
        .into_iter()
        .find(|c| c.id.as_str() == category_id)
        .ok_or_else(|| ApiError::NotFound(format!("category {category_id} in game {game}")))?;

    let levels: Vec<Level> = state
        .source
        .fetch_levels(&game)
        .await?
        .into_iter()
        .filter(|l| l.misc == category.misc)
        .collect();

    Ok(Json(LevelsResponse { category, levels }))
}
