//! Business logic services.

pub mod activity;
pub mod feed;
pub mod follow;
pub mod hashtag;
pub mod like;
pub mod post;
pub mod user;

pub use activity::ActivityService;
pub use feed::FeedService;
pub use follow::FollowService;
pub use hashtag::HashtagService;
pub use like::LikeService;
pub use post::PostService;
pub use user::UserService;
