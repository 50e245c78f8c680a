//! Medal table endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::routes::board_context;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::engine;
use crate::models::{MedalRow, RecordType};

#[derive(Debug, Deserialize)]
pub struct MedalsParams {
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

#[derive(Debug, Serialize)]
pub struct MedalsResponse {
    pub category: String,
    pub record_type: RecordType,
    pub rows: Vec<MedalRow>,
}

pub async fn medal_table(
    State(state): State<AppState>,
    Path((game, category_id)): Path<(String, String)>,
    Query(params): Query<MedalsParams>,
) -> Result<Json<MedalsResponse>, ApiError> {
    let ctx = board_context(&state, &game, &category_id, params.record_type).await?;

    if !ctx.category.practice_style {
        return Err(ApiError::BadRequest(format!(
            "category {} has world records only",
            ctx.category.name
        )));
    }

    let rows = engine::medal_table_for_category(&ctx.submissions, &ctx.levels, ctx.direction);

    Ok(Json(MedalsResponse {
        category: ctx.category.name,
        record_type: params.record_type,
        rows,
    }))
}
