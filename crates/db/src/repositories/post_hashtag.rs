//! Post-hashtag link repository.

use std::sync::Arc;

use crate::entities::{PostHashtag, post_hashtag};
use pulse_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// Repository for the post/hashtag association table.
#[derive(Clone)]
pub struct PostHashtagRepository {
    db: Arc<DatabaseConnection>,
}

impl PostHashtagRepository {
    /// Create a new post-hashtag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find link rows for a set of posts.
    pub async fn find_by_post_ids(&self, post_ids: &[String]) -> AppResult<Vec<post_hashtag::Model>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        PostHashtag::find()
            .filter(post_hashtag::Column::PostId.is_in(post_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace the hashtag set linked to a post on the given connection.
    ///
    /// Set semantics: existing links are removed before the new ones are
    /// inserted, so repeated calls are not additive.
    pub async fn replace_for_post_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_id: &str,
        hashtag_ids: &[String],
    ) -> AppResult<()> {
        PostHashtag::delete_many()
            .filter(post_hashtag::Column::PostId.eq(post_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if hashtag_ids.is_empty() {
            return Ok(());
        }

        let links = hashtag_ids.iter().map(|hashtag_id| post_hashtag::ActiveModel {
            post_id: Set(post_id.to_string()),
            hashtag_id: Set(hashtag_id.clone()),
        });

        PostHashtag::insert_many(links)
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Replace the hashtag set linked to a post.
    pub async fn replace_for_post(&self, post_id: &str, hashtag_ids: &[String]) -> AppResult<()> {
        self.replace_for_post_in(self.db.as_ref(), post_id, hashtag_ids)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_find_by_post_ids_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = PostHashtagRepository::new(db);
        let links = repo.find_by_post_ids(&[]).await.unwrap();

        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_replace_for_post_with_empty_set_only_deletes() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = PostHashtagRepository::new(db);
        repo.replace_for_post("p1", &[]).await.unwrap();
    }
}
