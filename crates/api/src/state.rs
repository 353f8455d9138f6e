//! Application state shared across handlers.

use std::sync::Arc;

use pulse_core::{
    ActivityService, FeedService, FollowService, HashtagService, LikeService, PostService,
    UserService,
};
use pulse_db::repositories::{
    ActivityRepository, FollowRepository, HashtagRepository, LikeRepository,
    PostHashtagRepository, PostRepository, UserRepository,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub post_service: PostService,
    pub like_service: LikeService,
    pub follow_service: FollowService,
    pub hashtag_service: HashtagService,
    pub activity_service: ActivityService,
    pub feed_service: FeedService,
}

impl AppState {
    /// Wire repositories and services on top of a database connection.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let post_repo = PostRepository::new(Arc::clone(&db));
        let like_repo = LikeRepository::new(Arc::clone(&db));
        let follow_repo = FollowRepository::new(Arc::clone(&db));
        let hashtag_repo = HashtagRepository::new(Arc::clone(&db));
        let post_hashtag_repo = PostHashtagRepository::new(Arc::clone(&db));
        let activity_repo = ActivityRepository::new(Arc::clone(&db));

        let activity_service = ActivityService::new(activity_repo, user_repo.clone());
        let post_service = PostService::new(
            Arc::clone(&db),
            post_repo.clone(),
            user_repo.clone(),
            hashtag_repo.clone(),
            post_hashtag_repo,
            like_repo.clone(),
            activity_service.clone(),
        );
        let user_service = UserService::new(user_repo.clone());
        let like_service = LikeService::new(
            Arc::clone(&db),
            like_repo,
            activity_service.clone(),
        );
        let follow_service = FollowService::new(
            Arc::clone(&db),
            follow_repo.clone(),
            user_repo,
            activity_service.clone(),
        );
        let hashtag_service =
            HashtagService::new(hashtag_repo, post_repo.clone(), post_service.clone());
        let feed_service = FeedService::new(follow_repo, post_repo, post_service.clone());

        Self {
            user_service,
            post_service,
            like_service,
            follow_service,
            hashtag_service,
            activity_service,
            feed_service,
        }
    }
}
