//! User endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use pulse_common::{AppError, AppResult};
use pulse_core::activity::ActivityFilter;
use pulse_core::follow::FollowerView;
use pulse_core::user::{CreateUserInput, UpdateUserInput};
use pulse_db::entities::activity::ActivityType;
use serde::{Deserialize, Serialize};

use crate::endpoints::activities::ActivityResponse;
use crate::pagination::Pagination;
use crate::response::UserResponse;
use crate::state::AppState;

#[derive(Serialize)]
struct UserListResponse {
    users: Vec<UserResponse>,
    total: u64,
    limit: u64,
    offset: u64,
}

/// A follower entry: the follower's user fields plus when they followed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FollowerResponse {
    #[serde(flatten)]
    user: UserResponse,
    followed_at: DateTime<FixedOffset>,
}

impl From<FollowerView> for FollowerResponse {
    fn from(view: FollowerView) -> Self {
        Self {
            user: view.user.into(),
            followed_at: view.followed_at,
        }
    }
}

#[derive(Serialize)]
struct FollowerListResponse {
    followers: Vec<FollowerResponse>,
    total: u64,
    limit: u64,
    offset: u64,
}

#[derive(Serialize)]
struct ActivityListResponse {
    activities: Vec<ActivityResponse>,
    total: u64,
    limit: u64,
    offset: u64,
}

/// Query parameters for a user's activity history.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityQueryParams {
    activity_type: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

fn parse_activity_type(raw: &str) -> AppResult<ActivityType> {
    match raw {
        "POST_CREATED" => Ok(ActivityType::PostCreated),
        "POST_LIKED" => Ok(ActivityType::PostLiked),
        "USER_FOLLOWED" => Ok(ActivityType::UserFollowed),
        "USER_UNFOLLOWED" => Ok(ActivityType::UserUnfollowed),
        _ => Err(AppError::Validation(format!(
            "Invalid activityType: {raw}"
        ))),
    }
}

fn parse_date(raw: &str, field: &str) -> AppResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .map_err(|_| AppError::Validation(format!("Invalid {field}: expected RFC 3339 timestamp")))
}

async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<UserListResponse>> {
    let page = page.checked()?;
    let (users, total) = state.user_service.list(page.limit, page.offset).await?;
    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get(&id).await?;
    Ok(Json(user.into()))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.user_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.update(&id, input).await?;
    Ok(Json(user.into()))
}

async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.user_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn followers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<FollowerListResponse>> {
    let page = page.checked()?;
    let (followers, total) = state
        .follow_service
        .list_followers(&id, page.limit, page.offset)
        .await?;
    Ok(Json(FollowerListResponse {
        followers: followers.into_iter().map(FollowerResponse::from).collect(),
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

async fn activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ActivityQueryParams>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<ActivityListResponse>> {
    let page = page.checked()?;

    let filter = ActivityFilter {
        activity_type: params
            .activity_type
            .as_deref()
            .map(parse_activity_type)
            .transpose()?,
        start_date: params
            .start_date
            .as_deref()
            .map(|raw| parse_date(raw, "startDate"))
            .transpose()?,
        end_date: params
            .end_date
            .as_deref()
            .map(|raw| parse_date(raw, "endDate"))
            .transpose()?,
    };

    let (activities, total) = state
        .activity_service
        .list_for_user(&id, filter, page.limit, page.offset)
        .await?;
    Ok(Json(ActivityListResponse {
        activities: activities.into_iter().map(ActivityResponse::from).collect(),
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(delete))
        .route("/{id}/followers", get(followers))
        .route("/{id}/activity", get(activity))
}
