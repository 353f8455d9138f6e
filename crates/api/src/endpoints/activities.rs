//! Activity endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use pulse_common::AppResult;
use pulse_core::activity::CreateActivityInput;
use pulse_db::entities::activity::{self, ActivityType};
use serde::Serialize;

use crate::pagination::Pagination;
use crate::state::AppState;

/// Activity log entry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: String,
    pub user_id: String,
    pub activity_type: ActivityType,
    pub target_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<activity::Model> for ActivityResponse {
    fn from(act: activity::Model) -> Self {
        Self {
            id: act.id,
            user_id: act.user_id,
            activity_type: act.activity_type,
            target_id: act.target_id,
            metadata: act.metadata,
            created_at: act.created_at,
        }
    }
}

#[derive(Serialize)]
struct ActivityListResponse {
    activities: Vec<ActivityResponse>,
    total: u64,
    limit: u64,
    offset: u64,
}

async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<ActivityListResponse>> {
    let page = page.checked()?;
    let (activities, total) = state.activity_service.list(page.limit, page.offset).await?;
    Ok(Json(ActivityListResponse {
        activities: activities.into_iter().map(ActivityResponse::from).collect(),
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActivityResponse>> {
    let act = state.activity_service.get(&id).await?;
    Ok(Json(act.into()))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateActivityInput>,
) -> AppResult<(StatusCode, Json<ActivityResponse>)> {
    let act = state.activity_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(act.into())))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.activity_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).delete(delete))
}
