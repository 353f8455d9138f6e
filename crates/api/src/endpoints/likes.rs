//! Like endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use pulse_common::AppResult;
use pulse_core::like::CreateLikeInput;
use pulse_db::entities::like;
use serde::Serialize;

use crate::pagination::Pagination;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LikeResponse {
    id: String,
    user_id: String,
    post_id: String,
    created_at: DateTime<FixedOffset>,
}

impl From<like::Model> for LikeResponse {
    fn from(like: like::Model) -> Self {
        Self {
            id: like.id,
            user_id: like.user_id,
            post_id: like.post_id,
            created_at: like.created_at,
        }
    }
}

#[derive(Serialize)]
struct LikeListResponse {
    likes: Vec<LikeResponse>,
    total: u64,
    limit: u64,
    offset: u64,
}

async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<LikeListResponse>> {
    let page = page.checked()?;
    let (likes, total) = state.like_service.list(page.limit, page.offset).await?;
    Ok(Json(LikeListResponse {
        likes: likes.into_iter().map(LikeResponse::from).collect(),
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LikeResponse>> {
    let like = state.like_service.get(&id).await?;
    Ok(Json(like.into()))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateLikeInput>,
) -> AppResult<(StatusCode, Json<LikeResponse>)> {
    let like = state.like_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(like.into())))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.like_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).delete(delete))
}
