//! Database entities.
//!
//! sea-orm models for every table, plus convenience `Entity` aliases.

#![allow(missing_docs)]

pub mod activity;
pub mod follow;
pub mod hashtag;
pub mod like;
pub mod post;
pub mod post_hashtag;
pub mod user;

pub use activity::Entity as Activity;
pub use follow::Entity as Follow;
pub use hashtag::Entity as Hashtag;
pub use like::Entity as Like;
pub use post::Entity as Post;
pub use post_hashtag::Entity as PostHashtag;
pub use user::Entity as User;
