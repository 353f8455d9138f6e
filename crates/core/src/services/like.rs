//! Like service.

use crate::services::ActivityService;
use chrono::Utc;
use pulse_common::{AppError, AppResult, IdGenerator};
use pulse_db::{
    entities::{activity::ActivityType, like},
    repositories::LikeRepository,
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Like service for business logic.
///
/// Likes are immutable: they are created and deleted, never updated.
#[derive(Clone)]
pub struct LikeService {
    db: Arc<DatabaseConnection>,
    like_repo: LikeRepository,
    activity: ActivityService,
    id_gen: IdGenerator,
}

/// Input for liking a post.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLikeInput {
    pub user_id: String,
    pub post_id: String,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        like_repo: LikeRepository,
        activity: ActivityService,
    ) -> Self {
        Self {
            db,
            like_repo,
            activity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like a post, recording a `POST_LIKED` activity in the same
    /// transaction.
    pub async fn create(&self, input: CreateLikeInput) -> AppResult<like::Model> {
        if self
            .like_repo
            .find_by_pair(&input.user_id, &input.post_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Post already liked by this user".to_string(),
            ));
        }

        let model = like::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(input.user_id.clone()),
            post_id: Set(input.post_id.clone()),
            created_at: Set(Utc::now().into()),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let like = self.like_repo.create_in(&txn, model).await?;

        self.activity
            .record_in(
                &txn,
                &input.user_id,
                ActivityType::PostLiked,
                Some(input.post_id),
                Some(json!({ "likeId": like.id })),
            )
            .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(like)
    }

    /// Get a like by ID.
    pub async fn get(&self, id: &str) -> AppResult<like::Model> {
        self.like_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Like".to_string()))
    }

    /// List likes, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<(Vec<like::Model>, u64)> {
        self.like_repo.find_all(limit, offset).await
    }

    /// Remove a like. No activity is recorded.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let affected = self.like_repo.delete(id).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Like".to_string()));
        }
        Ok(())
    }
}
