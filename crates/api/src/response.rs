//! Shared response types.

use chrono::{DateTime, FixedOffset};
use pulse_core::post::PostView;
use pulse_db::entities::{hashtag, user};
use serde::Serialize;

/// Full user representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            bio: user.bio,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Author summary embedded in post responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

impl From<user::Model> for AuthorResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
        }
    }
}

/// Hashtag reference embedded in post responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashtagRef {
    pub id: String,
    pub name: String,
}

impl From<hashtag::Model> for HashtagRef {
    fn from(tag: hashtag::Model) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// Denormalized post representation: author summary, hashtag refs, and the
/// like count instead of raw like rows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub author: Option<AuthorResponse>,
    pub hashtags: Vec<HashtagRef>,
    pub like_count: u64,
}

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        Self {
            id: view.post.id,
            content: view.post.content,
            created_at: view.post.created_at,
            updated_at: view.post.updated_at,
            author: view.author.map(AuthorResponse::from),
            hashtags: view.hashtags.into_iter().map(HashtagRef::from).collect(),
            like_count: view.like_count,
        }
    }
}
