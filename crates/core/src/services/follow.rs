//! Follow service.

use std::collections::HashMap;

use crate::services::ActivityService;
use chrono::{DateTime, FixedOffset, Utc};
use pulse_common::{AppError, AppResult, IdGenerator};
use pulse_db::{
    entities::{activity::ActivityType, follow, user},
    repositories::{FollowRepository, UserRepository},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Follow service for business logic.
///
/// Follows are immutable: they are created and deleted, never updated.
#[derive(Clone)]
pub struct FollowService {
    db: Arc<DatabaseConnection>,
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    activity: ActivityService,
    id_gen: IdGenerator,
}

/// Input for following a user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFollowInput {
    pub follower_id: String,
    pub following_id: String,
}

/// A follower denormalized with the time the follow was created.
#[derive(Debug, Clone)]
pub struct FollowerView {
    pub user: user::Model,
    pub followed_at: DateTime<FixedOffset>,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        follow_repo: FollowRepository,
        user_repo: UserRepository,
        activity: ActivityService,
    ) -> Self {
        Self {
            db,
            follow_repo,
            user_repo,
            activity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a user, recording a `USER_FOLLOWED` activity in the same
    /// transaction.
    pub async fn create(&self, input: CreateFollowInput) -> AppResult<follow::Model> {
        if input.follower_id == input.following_id {
            return Err(AppError::BadRequest(
                "Users cannot follow themselves".to_string(),
            ));
        }

        if self
            .follow_repo
            .find_by_pair(&input.follower_id, &input.following_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Already following this user".to_string()));
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(input.follower_id.clone()),
            following_id: Set(input.following_id.clone()),
            created_at: Set(Utc::now().into()),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let follow = self.follow_repo.create_in(&txn, model).await?;

        self.activity
            .record_in(
                &txn,
                &input.follower_id,
                ActivityType::UserFollowed,
                Some(input.following_id),
                Some(json!({ "followId": follow.id })),
            )
            .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(follow)
    }

    /// Get a follow by ID.
    pub async fn get(&self, id: &str) -> AppResult<follow::Model> {
        self.follow_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Follow".to_string()))
    }

    /// List follows, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<(Vec<follow::Model>, u64)> {
        self.follow_repo.find_all(limit, offset).await
    }

    /// Unfollow. A `USER_UNFOLLOWED` activity is recorded before the follow
    /// row is removed, in the same transaction, so the log survives the
    /// delete without ever existing alone.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let follow = self
            .follow_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Follow".to_string()))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.activity
            .record_in(
                &txn,
                &follow.follower_id,
                ActivityType::UserUnfollowed,
                Some(follow.following_id.clone()),
                Some(json!({ "followId": id })),
            )
            .await?;

        self.follow_repo.delete_in(&txn, id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List a user's followers, newest first.
    pub async fn list_followers(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<FollowerView>, u64)> {
        self.user_repo.get_by_id(user_id).await?;

        let (follows, total) = self.follow_repo.find_followers(user_id, limit, offset).await?;

        let follower_ids: Vec<String> = follows.iter().map(|f| f.follower_id.clone()).collect();
        let users: HashMap<String, user::Model> = self
            .user_repo
            .find_by_ids(&follower_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        let followers = follows
            .into_iter()
            .filter_map(|f| {
                users.get(&f.follower_id).map(|u| FollowerView {
                    user: u.clone(),
                    followed_at: f.created_at,
                })
            })
            .collect();

        Ok((followers, total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pulse_db::entities::activity;
    use pulse_db::repositories::ActivityRepository;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_follow(id: &str, follower_id: &str, following_id: &str) -> follow::Model {
        follow::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            following_id: following_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_user(id: &str, username: &str) -> user::Model {
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

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> FollowService {
        FollowService::new(
            db.clone(),
            FollowRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            ActivityService::new(
                ActivityRepository::new(db.clone()),
                UserRepository::new(db),
            ),
        )
    }

    #[tokio::test]
    async fn test_self_follow_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(db);
        let input = CreateFollowInput {
            follower_id: "user1".to_string(),
            following_id: "user1".to_string(),
        };

        let result = service.create(input).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_duplicate_follow_conflicts() {
        let existing = create_test_follow("f1", "user1", "user2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = service_with(db);
        let input = CreateFollowInput {
            follower_id: "user1".to_string(),
            following_id: "user2".to_string(),
        };

        let result = service.create(input).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_records_unfollow_activity_first() {
        let follow = create_test_follow("f1", "user1", "user2");
        let act = activity::Model {
            id: "a1".to_string(),
            user_id: "user1".to_string(),
            activity_type: ActivityType::UserUnfollowed,
            target_id: Some("user2".to_string()),
            metadata: Some(json!({ "followId": "f1" })),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![follow]])
                .append_query_results([vec![act]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let service = service_with(db);
        service.delete("f1").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_followers_denormalizes_users() {
        let user = create_test_user("user1", "alice");
        let follower_user = create_test_user("user2", "bob");
        let follow = create_test_follow("f1", "user2", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![user]])
                .append_query_results([vec![follow]])
                .append_query_results([vec![maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .append_query_results([vec![follower_user]])
                .into_connection(),
        );

        let service = service_with(db);
        let (followers, total) = service.list_followers("user1", 10, 0).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].user.username, "bob");
    }

    #[tokio::test]
    async fn test_list_followers_unknown_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.list_followers("missing", 10, 0).await;

        assert!(matches!(result, Err(AppError::UserNotFound)));
    }
}
