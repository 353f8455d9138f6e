//! Follow repository.

use std::sync::Arc;

use crate::entities::{Follow, follow};
use crate::error::classify_write_err;
use pulse_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follow by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<follow::Model>> {
        Follow::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a follow by (follower, following) pair.
    pub async fn find_by_pair(
        &self,
        follower_id: &str,
        following_id: &str,
    ) -> AppResult<Option<follow::Model>> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get IDs of all users the given user follows.
    ///
    /// Used for feed assembly; projects only the `following_id` column.
    pub async fn find_following_ids(&self, follower_id: &str) -> AppResult<Vec<String>> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .select_only()
            .column(follow::Column::FollowingId)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List follow rows targeting a user (their followers), newest first,
    /// with the total count.
    pub async fn find_followers(
        &self,
        following_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<follow::Model>, u64)> {
        let follows = Follow::find()
            .filter(follow::Column::FollowingId.eq(following_id))
            .order_by_desc(follow::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let total = Follow::find()
            .filter(follow::Column::FollowingId.eq(following_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((follows, total))
    }

    /// List follows (paginated, newest first) with the total count.
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<(Vec<follow::Model>, u64)> {
        let follows = Follow::find()
            .order_by_desc(follow::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let total = Follow::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((follows, total))
    }

    /// Create a new follow on the given connection.
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: follow::ActiveModel,
    ) -> AppResult<follow::Model> {
        model.insert(conn).await.map_err(|e| {
            classify_write_err(
                e,
                "Already following this user",
                "Follower or Following user not found",
            )
        })
    }

    /// Create a new follow.
    pub async fn create(&self, model: follow::ActiveModel) -> AppResult<follow::Model> {
        self.create_in(self.db.as_ref(), model).await
    }

    /// Delete a follow by ID on the given connection, returning the number of
    /// affected rows.
    pub async fn delete_in<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<u64> {
        let result = Follow::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Delete a follow by ID, returning the number of affected rows.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        self.delete_in(self.db.as_ref(), id).await
    }
}
