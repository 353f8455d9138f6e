//! API endpoints.

pub mod activities;
mod follows;
mod hashtags;
mod likes;
mod posts;
mod users;

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

/// Liveness check.
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Unmatched routes get a JSON 404 rather than an empty body.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/posts", posts::router())
        .route("/feed", get(posts::feed))
        .nest("/likes", likes::router())
        .nest("/follows", follows::router())
        .nest("/hashtags", hashtags::router())
        .nest("/activities", activities::router())
        .route("/health", get(health))
        .fallback(not_found)
}
