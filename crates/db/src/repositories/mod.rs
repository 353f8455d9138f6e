//! Database repositories.
//!
//! One repository per entity, each holding a shared connection handle.

mod activity;
mod follow;
mod hashtag;
mod like;
mod post;
mod post_hashtag;
mod user;

pub use activity::ActivityRepository;
pub use follow::FollowRepository;
pub use hashtag::HashtagRepository;
pub use like::LikeRepository;
pub use post::PostRepository;
pub use post_hashtag::PostHashtagRepository;
pub use user::UserRepository;
