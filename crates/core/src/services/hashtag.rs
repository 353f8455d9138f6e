//! Hashtag service.

use crate::services::PostService;
use crate::services::post::PostView;
use chrono::Utc;
use pulse_common::{AppError, AppResult, IdGenerator};
use pulse_db::{
    entities::hashtag,
    repositories::{HashtagRepository, PostRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Hashtag service for business logic.
#[derive(Clone)]
pub struct HashtagService {
    hashtag_repo: HashtagRepository,
    post_repo: PostRepository,
    posts: PostService,
    id_gen: IdGenerator,
}

/// Input for creating a hashtag.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHashtagInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Input for renaming a hashtag.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHashtagInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Normalize a tag: lowercase, strip a single leading `#`.
#[must_use]
pub fn normalize_tag(name: &str) -> String {
    let lowered = name.to_lowercase();
    lowered
        .strip_prefix('#')
        .map_or(lowered.clone(), ToString::to_string)
}

impl HashtagService {
    /// Create a new hashtag service.
    #[must_use]
    pub const fn new(
        hashtag_repo: HashtagRepository,
        post_repo: PostRepository,
        posts: PostService,
    ) -> Self {
        Self {
            hashtag_repo,
            post_repo,
            posts,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a hashtag with a normalized name.
    pub async fn create(&self, input: CreateHashtagInput) -> AppResult<hashtag::Model> {
        input.validate()?;

        let model = hashtag::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(normalize_tag(&input.name)),
            created_at: Set(Utc::now().into()),
        };

        self.hashtag_repo.create(model).await
    }

    /// Get a hashtag by ID.
    pub async fn get(&self, id: &str) -> AppResult<hashtag::Model> {
        self.hashtag_repo.get_by_id(id).await
    }

    /// List hashtags, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<(Vec<hashtag::Model>, u64)> {
        self.hashtag_repo.find_all(limit, offset).await
    }

    /// Rename a hashtag.
    pub async fn update(&self, id: &str, input: UpdateHashtagInput) -> AppResult<hashtag::Model> {
        input.validate()?;

        let tag = self.hashtag_repo.get_by_id(id).await?;
        let mut active: hashtag::ActiveModel = tag.into();
        active.name = Set(normalize_tag(&input.name));

        self.hashtag_repo.update(active).await
    }

    /// Delete a hashtag by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let affected = self.hashtag_repo.delete(id).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Hashtag".to_string()));
        }
        Ok(())
    }

    /// List posts carrying a tag, newest first.
    ///
    /// An unknown tag yields an empty page, not an error. Pagination happens
    /// in the database through the association table, so memory stays bounded
    /// no matter how popular the tag is.
    pub async fn posts_by_tag(
        &self,
        tag: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<PostView>, u64)> {
        let normalized = normalize_tag(tag);

        let Some(hashtag) = self.hashtag_repo.find_by_name(&normalized).await? else {
            return Ok((vec![], 0));
        };

        let (posts, total) = self.post_repo.find_by_hashtag(&hashtag.id, limit, offset).await?;
        let views = self.posts.hydrate_page(posts).await?;
        Ok((views, total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::ActivityService;
    use pulse_db::entities::post;
    use pulse_db::repositories::{
        ActivityRepository, LikeRepository, PostHashtagRepository, UserRepository,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> HashtagService {
        let posts = PostService::new(
            db.clone(),
            PostRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            HashtagRepository::new(db.clone()),
            PostHashtagRepository::new(db.clone()),
            LikeRepository::new(db.clone()),
            ActivityService::new(
                ActivityRepository::new(db.clone()),
                UserRepository::new(db.clone()),
            ),
        );
        HashtagService::new(
            HashtagRepository::new(db.clone()),
            PostRepository::new(db),
            posts,
        )
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("#Rust"), "rust");
        assert_eq!(normalize_tag("WEB"), "web");
        assert_eq!(normalize_tag("plain"), "plain");
    }

    #[tokio::test]
    async fn test_posts_by_unknown_tag_returns_empty_page() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<hashtag::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let (views, total) = service.posts_by_tag("nonexistent", 10, 0).await.unwrap();

        assert!(views.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_posts_by_tag_paginates_in_database() {
        let tag = hashtag::Model {
            id: "tag1".to_string(),
            name: "rust".to_string(),
            created_at: Utc::now().into(),
        };
        let post = post::Model {
            id: "post1".to_string(),
            content: "about rust".to_string(),
            author_id: "user1".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        let author = pulse_db::entities::user::Model {
            id: "user1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice".to_string(),
            bio: None,
            avatar_url: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // tag lookup
                .append_query_results([vec![tag]])
                // joined page + count
                .append_query_results([vec![post]])
                .append_query_results([vec![maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(7))
                }]])
                // hydration: authors, links, likes
                .append_query_results([vec![author]])
                .append_query_results([Vec::<pulse_db::entities::post_hashtag::Model>::new()])
                .append_query_results([Vec::<pulse_db::entities::like::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let (views, total) = service.posts_by_tag("#Rust", 10, 0).await.unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(total, 7);
        assert_eq!(views[0].author.as_ref().unwrap().username, "alice");
    }
}
