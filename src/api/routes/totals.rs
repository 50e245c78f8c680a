//! Totalizer endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::routes::board_context;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::engine;
use crate::models::{Profile, RecordType, TimeParts, TotalRow};

#[derive(Debug, Deserialize)]
pub struct TotalsParams {
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

/// A totalizer row with the display-ready time split attached for time
/// boards.
#[derive(Debug, Serialize)]
pub struct TotalRowBody {
    pub profile: Profile,
    pub total: f64,
    pub levels_counted: u32,
    pub position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeParts>,
}

impl TotalRowBody {
    fn from_row(row: TotalRow, record_type: RecordType) -> Self {
        let time = match record_type {
            RecordType::Time => Some(TimeParts::from_seconds(row.total)),
            RecordType::Score => None,
        };
        Self {
            profile: row.profile,
            total: row.total,
            levels_counted: row.levels_counted,
            position: row.position,
            time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub category: String,
    pub record_type: RecordType,
    pub par_total: f64,
    pub all: Vec<TotalRowBody>,
    pub live: Vec<TotalRowBody>,
}

pub async fn totalizer(
    State(state): State<AppState>,
    Path((game, category_id)): Path<(String, String)>,
    Query(params): Query<TotalsParams>,
) -> Result<Json<TotalsResponse>, ApiError> {
    let ctx = board_context(&state, &game, &category_id, params.record_type).await?;

    if !ctx.category.practice_style {
        return Err(ApiError::BadRequest(format!(
            "category {} has world records only",
            ctx.category.name
        )));
    }

    let board = engine::totalizer_board(&ctx.submissions, &ctx.levels, ctx.direction);

    let into_bodies = |rows: Vec<TotalRow>| {
        rows.into_iter()
            .map(|r| TotalRowBody::from_row(r, params.record_type))
            .collect()
    };

    Ok(Json(TotalsResponse {
        category: ctx.category.name,
        record_type: params.record_type,
        par_total: board.par_total,
        all: into_bodies(board.all),
        live: into_bodies(board.live),
    }))
}
