//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, like};
use crate::error::classify_write_err;
use pulse_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<like::Model>> {
        Like::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a like by (user, post) pair.
    pub async fn find_by_pair(&self, user_id: &str, post_id: &str) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find all likes on a set of posts (for like-count hydration).
    pub async fn find_by_post_ids(&self, post_ids: &[String]) -> AppResult<Vec<like::Model>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        Like::find()
            .filter(like::Column::PostId.is_in(post_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List likes (paginated, newest first) with the total count.
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<(Vec<like::Model>, u64)> {
        let likes = Like::find()
            .order_by_desc(like::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let total = Like::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((likes, total))
    }

    /// Create a new like on the given connection.
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: like::ActiveModel,
    ) -> AppResult<like::Model> {
        model.insert(conn).await.map_err(|e| {
            classify_write_err(e, "Post already liked by this user", "User or Post not found")
        })
    }

    /// Create a new like.
    pub async fn create(&self, model: like::ActiveModel) -> AppResult<like::Model> {
        self.create_in(self.db.as_ref(), model).await
    }

    /// Delete a like by ID, returning the number of affected rows.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Like::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_like(id: &str, user_id: &str, post_id: &str) -> like::Model {
        like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            post_id: post_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let like = create_test_like("l1", "user1", "post1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like.clone()]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let result = repo.find_by_pair("user1", "post1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, "l1");
    }

    #[tokio::test]
    async fn test_find_by_post_ids_counts_per_post() {
        let like1 = create_test_like("l1", "user1", "post1");
        let like2 = create_test_like("l2", "user2", "post1");
        let like3 = create_test_like("l3", "user1", "post2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![like1, like2, like3]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let likes = repo
            .find_by_post_ids(&["post1".to_string(), "post2".to_string()])
            .await
            .unwrap();

        assert_eq!(likes.len(), 3);
        assert_eq!(likes.iter().filter(|l| l.post_id == "post1").count(), 2);
    }
}
