//! API integration tests.
//!
//! Routes are exercised end to end against a mock database connection.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use pulse_api::{AppState, router as api_router};
use pulse_db::entities::user;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

fn test_user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: "Test User".to_string(),
        bio: None,
        avatar_url: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn app_with(db: DatabaseConnection) -> Router {
    let state = AppState::new(Arc::new(db));
    api_router().with_state(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "OK");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = app_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Route not found");
}

#[tokio::test]
async fn test_list_users_envelope() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_user("user1", "alice")]])
        .append_query_results([vec![maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(1))
        }]])
        .into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["limit"], 10);
    assert_eq!(json["offset"], 0);
    assert_eq!(json["users"][0]["username"], "alice");
    assert_eq!(json["users"][0]["fullName"], "Test User");
}

#[tokio::test]
async fn test_get_missing_user_returns_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/doesnotexist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "User not found");
}

#[tokio::test]
async fn test_create_then_get_user_round_trips() {
    let stored = test_user("user1", "alice");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // insert returning the created row, then the subsequent lookup
        .append_query_results([vec![stored.clone()]])
        .append_query_results([vec![stored]])
        .append_exec_results([sea_orm::MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let app = app_with(db);

    let create_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"alice","email":"alice@example.com","fullName":"Test User"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(create_response.status(), StatusCode::CREATED);
    let created = body_json(create_response).await;

    let get_response = app
        .oneshot(
            Request::builder()
                .uri("/users/user1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(get_response.status(), StatusCode::OK);
    let fetched = body_json(get_response).await;

    assert_eq!(created["username"], fetched["username"]);
    assert_eq!(created["email"], fetched["email"]);
    assert_eq!(created["fullName"], fetched["fullName"]);
}

#[tokio::test]
async fn test_create_user_with_invalid_email_returns_400() {
    let app = app_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"alice","email":"nope","fullName":"Alice"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pagination_limit_zero_rejected() {
    let app = app_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users?limit=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pagination_limit_over_100_rejected() {
    let app = app_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts?limit=101")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feed_requires_user_id() {
    let app = app_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/feed")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "userId query parameter is required");
}

#[tokio::test]
async fn test_feed_rejects_empty_user_id() {
    let app = app_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/feed?userId=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "userId query parameter is required");
}

#[tokio::test]
async fn test_feed_for_lonely_user_is_empty() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // following-id projection comes back empty
        .append_query_results([Vec::<std::collections::BTreeMap<&str, sea_orm::Value>>::new()])
        .into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/feed?userId=user1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["posts"], serde_json::json!([]));
    assert_eq!(json["total"], 0);
    assert_eq!(json["limit"], 10);
    assert_eq!(json["offset"], 0);
}

#[tokio::test]
async fn test_self_follow_rejected() {
    let app = app_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/follows")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"followerId":"user1","followingId":"user1"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Users cannot follow themselves");
}

#[tokio::test]
async fn test_posts_by_unknown_hashtag_is_empty_page() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<pulse_db::entities::hashtag::Model>::new()])
        .into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts/hashtag/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["posts"], serde_json::json!([]));
    assert_eq!(json["total"], 0);
    assert_eq!(json["hashtag"], "nonexistent");
}

#[tokio::test]
async fn test_activity_query_rejects_partial_date_range() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_user("user1", "alice")]])
        .into_connection();
    let app = app_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/user1/activity?startDate=2026-01-01T00:00:00Z")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activity_query_rejects_unknown_type() {
    let app = app_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/user1/activity?activityType=POST_EATEN")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
