//! Post service.

use std::collections::HashMap;

use crate::services::ActivityService;
use chrono::Utc;
use pulse_common::{AppError, AppResult, IdGenerator};
use pulse_db::{
    entities::{activity::ActivityType, hashtag, post, user},
    repositories::{
        HashtagRepository, LikeRepository, PostHashtagRepository, PostRepository, UserRepository,
    },
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::{Validate, ValidationError};

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    db: Arc<DatabaseConnection>,
    post_repo: PostRepository,
    user_repo: UserRepository,
    hashtag_repo: HashtagRepository,
    post_hashtag_repo: PostHashtagRepository,
    like_repo: LikeRepository,
    activity: ActivityService,
    id_gen: IdGenerator,
}

/// Input for creating a new post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,

    pub author_id: String,

    #[validate(length(max = 30), custom(function = validate_hashtag_items))]
    #[serde(default)]
    pub hashtags: Vec<String>,
}

fn validate_hashtag_items(tags: &[String]) -> Result<(), ValidationError> {
    for tag in tags {
        let len = tag.chars().count();
        if len == 0 || len > 100 {
            let mut err = ValidationError::new("length");
            err.message = Some("Each hashtag must be between 1 and 100 characters".into());
            return Err(err);
        }
    }
    Ok(())
}

/// Input for updating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 5000))]
    pub content: Option<String>,
}

/// A post denormalized with its author, hashtags, and like count.
///
/// Raw like rows never leave the service layer; clients only see the count.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: post::Model,
    pub author: Option<user::Model>,
    pub hashtags: Vec<hashtag::Model>,
    pub like_count: u64,
}

/// Normalize hashtag names: lowercase, strip a leading `#`, drop empties,
/// dedupe while preserving order.
#[must_use]
pub fn normalize_hashtags(names: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for name in names {
        let normalized = crate::services::hashtag::normalize_tag(name);
        if normalized.is_empty() {
            continue;
        }
        if !seen.contains(&normalized) {
            seen.push(normalized);
        }
    }
    seen
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        post_repo: PostRepository,
        user_repo: UserRepository,
        hashtag_repo: HashtagRepository,
        post_hashtag_repo: PostHashtagRepository,
        like_repo: LikeRepository,
        activity: ActivityService,
    ) -> Self {
        Self {
            db,
            post_repo,
            user_repo,
            hashtag_repo,
            post_hashtag_repo,
            like_repo,
            activity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new post, resolving its hashtag set and recording a
    /// `POST_CREATED` activity.
    ///
    /// Hashtag rows are resolved before the transaction opens (they are
    /// global and idempotent); the post, its links, and the activity then
    /// commit or roll back as one unit.
    pub async fn create(&self, input: CreatePostInput) -> AppResult<PostView> {
        input.validate()?;

        let tag_names = normalize_hashtags(&input.hashtags);
        let mut tag_ids = Vec::with_capacity(tag_names.len());
        for name in &tag_names {
            let tag = self.hashtag_repo.get_or_create(name).await?;
            tag_ids.push(tag.id);
        }

        let now = Utc::now();
        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(input.content.clone()),
            author_id: Set(input.author_id.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let post = self.post_repo.create_in(&txn, model).await?;

        if !tag_ids.is_empty() {
            self.post_hashtag_repo
                .replace_for_post_in(&txn, &post.id, &tag_ids)
                .await?;
        }

        self.activity
            .record_in(
                &txn,
                &input.author_id,
                ActivityType::PostCreated,
                Some(post.id.clone()),
                Some(json!({ "content": truncate_chars(&input.content, 100) })),
            )
            .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");
        self.hydrate(post).await
    }

    /// Get a post by ID.
    pub async fn get(&self, id: &str) -> AppResult<PostView> {
        let post = self
            .post_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::PostNotFound)?;
        self.hydrate(post).await
    }

    /// List posts, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<(Vec<PostView>, u64)> {
        let (posts, total) = self.post_repo.find_all(limit, offset).await?;
        let views = self.hydrate_page(posts).await?;
        Ok((views, total))
    }

    /// Update a post's content.
    ///
    /// No activity is recorded for post updates.
    pub async fn update(&self, id: &str, input: UpdatePostInput) -> AppResult<PostView> {
        input.validate()?;

        let post = self
            .post_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::PostNotFound)?;

        let mut active: post::ActiveModel = post.into();
        if let Some(content) = input.content {
            active.content = Set(content);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = self.post_repo.update(active).await?;
        self.hydrate(updated).await
    }

    /// Delete a post. Cascades to its likes and hashtag associations.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let affected = self.post_repo.delete(id).await?;
        if affected == 0 {
            return Err(AppError::PostNotFound);
        }
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Denormalize a single post.
    pub async fn hydrate(&self, post: post::Model) -> AppResult<PostView> {
        let mut views = self.hydrate_page(vec![post]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("Hydration produced no view".to_string()))
    }

    /// Denormalize a page of posts with batched lookups.
    ///
    /// Issues one query per relation for the whole page rather than per post.
    pub async fn hydrate_page(&self, posts: Vec<post::Model>) -> AppResult<Vec<PostView>> {
        if posts.is_empty() {
            return Ok(vec![]);
        }

        let post_ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();

        let mut author_ids: Vec<String> = posts.iter().map(|p| p.author_id.clone()).collect();
        author_ids.sort();
        author_ids.dedup();
        let authors: HashMap<String, user::Model> = self
            .user_repo
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        let links = self.post_hashtag_repo.find_by_post_ids(&post_ids).await?;
        let mut hashtag_ids: Vec<String> = links.iter().map(|l| l.hashtag_id.clone()).collect();
        hashtag_ids.sort();
        hashtag_ids.dedup();
        let hashtags: HashMap<String, hashtag::Model> = self
            .hashtag_repo
            .find_by_ids(&hashtag_ids)
            .await?
            .into_iter()
            .map(|h| (h.id.clone(), h))
            .collect();

        let mut tags_by_post: HashMap<String, Vec<hashtag::Model>> = HashMap::new();
        for link in links {
            if let Some(tag) = hashtags.get(&link.hashtag_id) {
                tags_by_post
                    .entry(link.post_id)
                    .or_default()
                    .push(tag.clone());
            }
        }

        let mut like_counts: HashMap<String, u64> = HashMap::new();
        for like in self.like_repo.find_by_post_ids(&post_ids).await? {
            *like_counts.entry(like.post_id).or_default() += 1;
        }

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned();
                let hashtags = tags_by_post.remove(&post.id).unwrap_or_default();
                let like_count = like_counts.get(&post.id).copied().unwrap_or(0);
                PostView {
                    post,
                    author,
                    hashtags,
                    like_count,
                }
            })
            .collect())
    }
}
