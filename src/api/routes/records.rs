//! World-record board endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::routes::board_context;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::engine;
use crate::models::{Level, RecordType, Submission, WorldRecordBoard};

#[derive(Debug, Deserialize)]
pub struct RecordsParams {
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Return the full submission history instead of the filtered board.
    #[serde(default)]
    pub show_obsolete: bool,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub level: Level,
    pub record_type: RecordType,

    /// The ranked board; absent in show-obsolete mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<WorldRecordBoard>,

    /// Submission-time-ordered history; present in show-obsolete mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<Submission>>,
}

pub async fn level_records(
    State(state): State<AppState>,
    Path((game, category_id, level_id)): Path<(String, String, String)>,
    Query(params): Query<RecordsParams>,
) -> Result<Json<RecordsResponse>, ApiError> {
    let ctx = board_context(&state, &game, &category_id, params.record_type).await?;

    let level = ctx
        .levels
        .iter()
        .find(|l| l.id.as_str() == level_id)
        .cloned()
        .ok_or_else(|| {
            ApiError::NotFound(format!("level {level_id} in category {category_id}"))
        })?;

    if !level.chart.allows(params.record_type) {
        return Err(ApiError::BadRequest(format!(
            "level {} has no {} chart",
            level.name, params.record_type
        )));
    }

    let level_submissions: Vec<Submission> = ctx
        .submissions
        .into_iter()
        .filter(|s| s.level.id == level.id)
        .collect();

    let response = if params.show_obsolete {
        RecordsResponse {
            level,
            record_type: params.record_type,
            board: None,
            history: Some(engine::submission_history(&level_submissions)),
        }
    } else {
        let adjacent = engine::adjacent_levels(&ctx.levels, &level.id);
        RecordsResponse {
            record_type: params.record_type,
            board: Some(engine::world_record_board(
                &level_submissions,
                ctx.direction,
                adjacent,
            )),
            history: None,
            level,
        }
    };

    Ok(Json(response))
}
