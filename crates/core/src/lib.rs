//! Core business logic for filmgraph.

pub mod services;

pub use services::*;

use filmgraph_common::Config;
use filmgraph_db::repositories::{
    FeedEventRepository, FilmLikeRepository, FriendshipRepository, ReviewMarkRepository,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Every service, wired to one database connection and one entity store.
#[derive(Clone)]
pub struct CoreServices {
    /// Friendship state machine.
    pub friendship: FriendshipService,
    /// Film likes and popularity.
    pub likes: LikeService,
    /// Film recommendations.
    pub recommendations: RecommendationService,
    /// Review usefulness marks and review lifecycle.
    pub review_marks: ReviewMarkService,
    /// Activity feed.
    pub activity_feed: ActivityFeedService,
}

impl CoreServices {
    /// Build the services.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        entity_store: Arc<dyn EntityStore>,
        config: &Config,
    ) -> Self {
        let friendship_repo = FriendshipRepository::new(db.clone());

        let activity_feed = ActivityFeedService::new(
            FeedEventRepository::new(db.clone()),
            friendship_repo.clone(),
            entity_store.clone(),
            config.feed.clone(),
        );
        let friendship = FriendshipService::new(
            friendship_repo,
            entity_store.clone(),
            activity_feed.clone(),
        );
        let likes = LikeService::new(
            FilmLikeRepository::new(db.clone()),
            entity_store.clone(),
            activity_feed.clone(),
            config.popular.clone(),
        );
        let recommendations = RecommendationService::new(likes.clone(), entity_store.clone());
        let review_marks = ReviewMarkService::new(
            ReviewMarkRepository::new(db),
            entity_store,
            activity_feed.clone(),
        );

        tracing::debug!("Core services initialized");

        Self {
            friendship,
            likes,
            recommendations,
            review_marks,
            activity_feed,
        }
    }
}
