//! Post endpoints, plus the feed and hashtag-lookup views built on posts.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use pulse_common::{AppError, AppResult};
use pulse_core::hashtag::normalize_tag;
use pulse_core::post::{CreatePostInput, UpdatePostInput};
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;
use crate::response::PostResponse;
use crate::state::AppState;

#[derive(Serialize)]
pub(crate) struct PostListResponse {
    posts: Vec<PostResponse>,
    total: u64,
    limit: u64,
    offset: u64,
}

/// Hashtag lookups echo the normalized tag back alongside the page.
#[derive(Serialize)]
struct TaggedPostListResponse {
    posts: Vec<PostResponse>,
    total: u64,
    limit: u64,
    offset: u64,
    hashtag: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeedParams {
    user_id: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<PostListResponse>> {
    let page = page.checked()?;
    let (posts, total) = state.post_service.list(page.limit, page.offset).await?;
    Ok(Json(PostListResponse {
        posts: posts.into_iter().map(PostResponse::from).collect(),
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PostResponse>> {
    let view = state.post_service.get(&id).await?;
    Ok(Json(view.into()))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<(StatusCode, Json<PostResponse>)> {
    let view = state.post_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePostInput>,
) -> AppResult<Json<PostResponse>> {
    let view = state.post_service.update(&id, input).await?;
    Ok(Json(view.into()))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.post_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /feed?userId=` — posts from the users someone follows.
pub async fn feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<PostListResponse>> {
    let user_id = params
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("userId query parameter is required".to_string()))?;
    let page = page.checked()?;

    let (posts, total) = state
        .feed_service
        .get_feed(&user_id, page.limit, page.offset)
        .await?;
    Ok(Json(PostListResponse {
        posts: posts.into_iter().map(PostResponse::from).collect(),
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// `GET /posts/hashtag/{tag}` — posts carrying a tag. Unknown tags yield an
/// empty page rather than a 404.
async fn by_hashtag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<TaggedPostListResponse>> {
    let page = page.checked()?;
    let (posts, total) = state
        .hashtag_service
        .posts_by_tag(&tag, page.limit, page.offset)
        .await?;
    Ok(Json(TaggedPostListResponse {
        posts: posts.into_iter().map(PostResponse::from).collect(),
        total,
        limit: page.limit,
        offset: page.offset,
        hashtag: normalize_tag(&tag),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/hashtag/{tag}", get(by_hashtag))
        .route("/{id}", get(show).put(update).delete(delete))
}
