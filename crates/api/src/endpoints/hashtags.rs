//! Hashtag endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use pulse_common::AppResult;
use pulse_core::hashtag::{CreateHashtagInput, UpdateHashtagInput};
use pulse_db::entities::hashtag;
use serde::Serialize;

use crate::pagination::Pagination;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashtagResponse {
    id: String,
    name: String,
    created_at: DateTime<FixedOffset>,
}

impl From<hashtag::Model> for HashtagResponse {
    fn from(tag: hashtag::Model) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            created_at: tag.created_at,
        }
    }
}

#[derive(Serialize)]
struct HashtagListResponse {
    hashtags: Vec<HashtagResponse>,
    total: u64,
    limit: u64,
    offset: u64,
}

async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<HashtagListResponse>> {
    let page = page.checked()?;
    let (hashtags, total) = state.hashtag_service.list(page.limit, page.offset).await?;
    Ok(Json(HashtagListResponse {
        hashtags: hashtags.into_iter().map(HashtagResponse::from).collect(),
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<HashtagResponse>> {
    let tag = state.hashtag_service.get(&id).await?;
    Ok(Json(tag.into()))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateHashtagInput>,
) -> AppResult<(StatusCode, Json<HashtagResponse>)> {
    let tag = state.hashtag_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateHashtagInput>,
) -> AppResult<Json<HashtagResponse>> {
    let tag = state.hashtag_service.update(&id, input).await?;
    Ok(Json(tag.into()))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.hashtag_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(delete))
}
