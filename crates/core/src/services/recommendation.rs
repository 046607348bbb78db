//! Recommendation service.

use crate::services::entity_store::EntityStore;
use crate::services::like::LikeService;
use filmgraph_common::{AppResult, FilmId, UserId};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Recommends films liked by users with overlapping taste.
#[derive(Clone)]
pub struct RecommendationService {
    likes: LikeService,
    entity_store: Arc<dyn EntityStore>,
}

impl RecommendationService {
    /// Create a new recommendation service.
    #[must_use]
    pub fn new(likes: LikeService, entity_store: Arc<dyn EntityStore>) -> Self {
        Self {
            likes,
            entity_store,
        }
    }

    /// Films liked by anyone who shares a liked film with the user, minus the
    /// films the user already likes.
    pub async fn recommendations_for(&self, user_id: UserId) -> AppResult<BTreeSet<FilmId>> {
        self.entity_store.ensure_user(user_id).await?;

        let own = self.likes.liked_films_of(user_id).await?;
        if own.is_empty() {
            return Ok(BTreeSet::new());
        }

        let peers = self.likes.co_likers(user_id, &own).await?;
        let candidates = self.likes.films_liked_by_any(&peers, &own).await?;

        tracing::debug!(
            user_id,
            peers = peers.len(),
            candidates = candidates.len(),
            "Computed recommendations"
        );
        Ok(candidates)
    }
}
