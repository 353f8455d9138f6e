//! Follow endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use pulse_common::AppResult;
use pulse_core::follow::CreateFollowInput;
use pulse_db::entities::follow;
use serde::Serialize;

use crate::pagination::Pagination;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FollowResponse {
    id: String,
    follower_id: String,
    following_id: String,
    created_at: DateTime<FixedOffset>,
}

impl From<follow::Model> for FollowResponse {
    fn from(follow: follow::Model) -> Self {
        Self {
            id: follow.id,
            follower_id: follow.follower_id,
            following_id: follow.following_id,
            created_at: follow.created_at,
        }
    }
}

#[derive(Serialize)]
struct FollowListResponse {
    follows: Vec<FollowResponse>,
    total: u64,
    limit: u64,
    offset: u64,
}

async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<FollowListResponse>> {
    let page = page.checked()?;
    let (follows, total) = state.follow_service.list(page.limit, page.offset).await?;
    Ok(Json(FollowListResponse {
        follows: follows.into_iter().map(FollowResponse::from).collect(),
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FollowResponse>> {
    let follow = state.follow_service.get(&id).await?;
    Ok(Json(follow.into()))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateFollowInput>,
) -> AppResult<(StatusCode, Json<FollowResponse>)> {
    let follow = state.follow_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(follow.into())))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.follow_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).delete(delete))
}
