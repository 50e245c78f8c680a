//! Submission listing and moderation.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::routes::game_submissions;
use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::models::{RawSubmission, RecordType, Submission};
use crate::storage::{EntityType, JsonlReader, JsonlWriter};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(rename = "type")]
    pub record_type: Option<RecordType>,
    pub live: Option<bool>,
    pub approved: Option<bool>,
    pub monkey: Option<String>,
    pub platform: Option<String>,
    pub region: Option<String>,
    pub tas: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListParams {
    fn matches(&self, s: &Submission) -> bool {
        fn tag_matches(filter: &Option<String>, value: &Option<String>) -> bool {
            match filter {
                Some(wanted) => value
                    .as_deref()
                    .is_some_and(|v| v.eq_ignore_ascii_case(wanted)),
                None => true,
            }
        }

        self.live.map_or(true, |want| s.live == want)
            && self.approved.map_or(true, |want| s.approved == want)
            && self.tas.map_or(true, |want| s.tas == want)
            && tag_matches(&self.monkey, &s.monkey)
            && tag_matches(&self.platform, &s.platform)
            && tag_matches(&self.region, &s.region)
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub submissions: Vec<Submission>,
    pub pagination: PaginationMeta,
}

/// List a game's normalized submissions, newest first.
pub async fn list(
    State(state): State<AppState>,
    Path(game): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError> {
    let record_types = match params.record_type {
        Some(rt) => vec![rt],
        None => vec![RecordType::Score, RecordType::Time],
    };

    let mut submissions: Vec<Submission> = Vec::new();
    for rt in record_types {
        let set = game_submissions(&state, &game, rt).await?;
        submissions.extend(set.iter().filter(|s| params.matches(s)).cloned());
    }
    submissions.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

    let pagination = Pagination::new(params.page, params.page_size);
    let total = submissions.len() as u32;
    let page: Vec<Submission> = submissions
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.page_size as usize)
        .collect();

    Ok(Json(ListResponse {
        submissions: page,
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

#[derive(Debug, Serialize)]
pub struct ModerationResponse {
    pub id: String,
    pub approved: bool,
}

/// Approve a submission and invalidate the game's cached boards.
pub async fn approve(
    State(state): State<AppState>,
    Path((game, id)): Path<(String, String)>,
) -> Result<Json<ModerationResponse>, ApiError> {
    let mut found = false;
    for entity in [EntityType::ScoreSubmission, EntityType::TimeSubmission] {
        let reader = JsonlReader::<RawSubmission>::for_game(&state.storage, entity, &game);
        let mut rows = reader.read_all()?;
        if let Some(row) = rows.iter_mut().find(|r| r.id.as_str() == id) {
            row.approved = true;
            JsonlWriter::for_game(&state.storage, entity, &game).write_all(&rows)?;
            found = true;
            break;
        }
    }

    if !found {
        return Err(ApiError::NotFound(format!("submission {id} in game {game}")));
    }

    state.cache.invalidate_game(&game).await;
    tracing::info!(%game, %id, "submission approved");

    Ok(Json(ModerationResponse { id, approved: true }))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}

/// Delete a submission and invalidate the game's cached boards.
pub async fn remove(
    State(state): State<AppState>,
    Path((game, id)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let mut found = false;
    for entity in [EntityType::ScoreSubmission, EntityType::TimeSubmission] {
        let reader = JsonlReader::<RawSubmission>::for_game(&state.storage, entity, &game);
        let mut rows = reader.read_all()?;
        let before = rows.len();
        rows.retain(|r| r.id.as_str() != id);
        if rows.len() != before {
            JsonlWriter::for_game(&state.storage, entity, &game).write_all(&rows)?;
            found = true;
            break;
        }
    }

    if !found {
        return Err(ApiError::NotFound(format!("submission {id} in game {game}")));
    }

    state.cache.invalidate_game(&game).await;
    tracing::info!(%game, %id, "submission deleted");

    Ok(Json(DeleteResponse { id, deleted: true }))
}
