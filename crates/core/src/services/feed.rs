//! Feed service.

use crate::services::PostService;
use crate::services::post::PostView;
use pulse_common::AppResult;
use pulse_db::repositories::{FollowRepository, PostRepository};

/// Feed service: assembles a user's timeline from the people they follow.
#[derive(Clone)]
pub struct FeedService {
    follow_repo: FollowRepository,
    post_repo: PostRepository,
    posts: PostService,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(
        follow_repo: FollowRepository,
        post_repo: PostRepository,
        posts: PostService,
    ) -> Self {
        Self {
            follow_repo,
            post_repo,
            posts,
        }
    }

    /// Assemble a user's feed: posts from followed authors, newest first.
    ///
    /// A user following nobody gets an empty page without touching the posts
    /// table.
    pub async fn get_feed(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<PostView>, u64)> {
        let following_ids = self.follow_repo.find_following_ids(user_id).await?;

        if following_ids.is_empty() {
            return Ok((vec![], 0));
        }

        let (posts, total) = self
            .post_repo
            .find_by_author_ids(&following_ids, limit, offset)
            .await?;

        let views = self.posts.hydrate_page(posts).await?;
        Ok((views, total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::ActivityService;
    use chrono::Utc;
    use pulse_db::entities::{post, user};
    use pulse_db::repositories::{
        ActivityRepository, HashtagRepository, LikeRepository, PostHashtagRepository,
        UserRepository,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> FeedService {
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
        FeedService::new(
            FollowRepository::new(db.clone()),
            PostRepository::new(db),
            posts,
        )
    }

    #[tokio::test]
    async fn test_feed_empty_when_following_nobody() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // no follows: the posts table is never queried
                .append_query_results([Vec::<std::collections::BTreeMap<&str, sea_orm::Value>>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let (views, total) = service.get_feed("user1", 10, 0).await.unwrap();

        assert!(views.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_feed_hydrates_followed_posts() {
        let post = post::Model {
            id: "post1".to_string(),
            content: "hello".to_string(),
            author_id: "user2".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        let author = user::Model {
            id: "user2".to_string(),
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            full_name: "Bob".to_string(),
            bio: None,
            avatar_url: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // following ids projection
                .append_query_results([vec![maplit::btreemap! {
                    "following_id" => sea_orm::Value::String(Some(Box::new("user2".to_string())))
                }]])
                // posts page + count
                .append_query_results([vec![post]])
                .append_query_results([vec![maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                // hydration: authors, links, likes
                .append_query_results([vec![author]])
                .append_query_results([Vec::<pulse_db::entities::post_hashtag::Model>::new()])
                .append_query_results([Vec::<pulse_db::entities::like::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let (views, total) = service.get_feed("user1", 10, 0).await.unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(total, 1);
        assert_eq!(views[0].author.as_ref().unwrap().username, "bob");
        assert_eq!(views[0].like_count, 0);
    }
}
