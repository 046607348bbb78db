//! Review mark service.
//!
//! Users mark reviews as useful or not useful. A review's usefulness is the
//! number of useful marks minus the number of not-useful marks. This service also
//! records the review lifecycle in the activity feed, since the reviews themselves
//! are stored elsewhere.
//!
//! Authoring is recorded as `REVIEW/ADD`, `REVIEW/UPDATE` and `REVIEW/REMOVE`.
//! Every change to a mark is recorded as `REVIEW/UPDATE` by the marking user, so a
//! mark never reads as the user writing or deleting the review.

use crate::services::activity_feed::{
    ActivityFeedService, Event, EventOperation, EventSubject, NewEvent,
};
use crate::services::entity_store::EntityStore;
use filmgraph_common::{AppError, AppResult, ReviewId, UserId};
use filmgraph_db::repositories::{ReviewMarkRepository, commit};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Outcome of a [`ReviewMarkService::mark`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkTransition {
    /// The user had no mark on the review.
    Created,
    /// The user's mark changed polarity.
    Flipped,
    /// The user already held this mark.
    Unchanged,
}

/// A review and its usefulness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReviewUsefulness {
    /// The review.
    pub review_id: ReviewId,
    /// Useful marks minus not-useful marks.
    pub usefulness: i64,
}

/// Reviews returned by [`ReviewMarkService::rank_reviews`] when no limit is given.
pub const DEFAULT_RANKED_REVIEWS: u64 = 10;

/// Review mark service for business logic.
#[derive(Clone)]
pub struct ReviewMarkService {
    mark_repo: ReviewMarkRepository,
    entity_store: Arc<dyn EntityStore>,
    activity_feed: ActivityFeedService,
}

impl ReviewMarkService {
    /// Create a new review mark service.
    #[must_use]
    pub fn new(
        mark_repo: ReviewMarkRepository,
        entity_store: Arc<dyn EntityStore>,
        activity_feed: ActivityFeedService,
    ) -> Self {
        Self {
            mark_repo,
            entity_store,
            activity_feed,
        }
    }

    /// Mark a review as useful or not useful, replacing any earlier mark.
    pub async fn mark(
        &self,
        user_id: UserId,
        review_id: ReviewId,
        is_useful: bool,
    ) -> AppResult<MarkTransition> {
        self.entity_store.ensure_user(user_id).await?;
        self.ensure_live_review(review_id).await?;

        let txn = self.mark_repo.begin().await?;

        let transition = if self
            .mark_repo
            .insert(&txn, user_id, review_id, is_useful)
            .await?
        {
            MarkTransition::Created
        } else if self
            .mark_repo
            .set_polarity(&txn, user_id, review_id, is_useful)
            .await?
        {
            MarkTransition::Flipped
        } else {
            tracing::debug!(user_id, review_id, is_useful, "Review mark unchanged");
            return Ok(MarkTransition::Unchanged);
        };

        self.activity_feed
            .record_in(
                &txn,
                NewEvent::now(
                    user_id,
                    review_id,
                    EventSubject::Review,
                    EventOperation::Update,
                ),
            )
            .await?;
        commit(txn).await?;

        tracing::info!(user_id, review_id, is_useful, ?transition, "Review marked");
        Ok(transition)
    }

    /// Remove a user's mark on a review. Returns `true` if a mark existed.
    pub async fn unmark(&self, user_id: UserId, review_id: ReviewId) -> AppResult<bool> {
        self.entity_store.ensure_user(user_id).await?;
        self.ensure_live_review(review_id).await?;

        let txn = self.mark_repo.begin().await?;

        if !self.mark_repo.delete(&txn, user_id, review_id).await? {
            tracing::debug!(user_id, review_id, "No review mark to remove");
            return Ok(false);
        }

        self.activity_feed
            .record_in(
                &txn,
                NewEvent::now(
                    user_id,
                    review_id,
                    EventSubject::Review,
                    EventOperation::Update,
                ),
            )
            .await?;
        commit(txn).await?;

        tracing::info!(user_id, review_id, "Review mark removed");
        Ok(true)
    }

    /// Useful marks minus not-useful marks.
    pub async fn usefulness(&self, review_id: ReviewId) -> AppResult<i64> {
        let scores = self.mark_repo.usefulness_of(&[review_id]).await?;
        Ok(scores.get(&review_id).copied().unwrap_or(0))
    }

    /// Order reviews by usefulness, most useful first, ties by ascending id.
    pub async fn rank_reviews(
        &self,
        review_ids: &[ReviewId],
        limit: Option<u64>,
    ) -> AppResult<Vec<ReviewUsefulness>> {
        let limit = match limit {
            Some(0) => {
                return Err(AppError::BadRequest(
                    "Limit must be greater than zero".to_string(),
                ));
            }
            Some(n) => n,
            None => DEFAULT_RANKED_REVIEWS,
        };

        let ids: Vec<ReviewId> = review_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let scores = self.mark_repo.usefulness_of(&ids).await?;

        let mut ranked: Vec<ReviewUsefulness> = ids
            .into_iter()
            .map(|review_id| ReviewUsefulness {
                review_id,
                usefulness: scores.get(&review_id).copied().unwrap_or(0),
            })
            .collect();
        ranked.sort_by(|a, b| b.usefulness.cmp(&a.usefulness));
        ranked.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

        Ok(ranked)
    }

    /// Record that `author_id` published a review.
    pub async fn review_created(&self, author_id: UserId, review_id: ReviewId) -> AppResult<Event> {
        self.entity_store.ensure_user(author_id).await?;
        self.ensure_live_review(review_id).await?;

        self.activity_feed
            .record(NewEvent::now(
                author_id,
                review_id,
                EventSubject::Review,
                EventOperation::Add,
            ))
            .await
    }

    /// Record that `author_id` edited a review.
    pub async fn review_updated(&self, author_id: UserId, review_id: ReviewId) -> AppResult<Event> {
        self.entity_store.ensure_user(author_id).await?;
        self.ensure_live_review(review_id).await?;

        self.activity_feed
            .record(NewEvent::now(
                author_id,
                review_id,
                EventSubject::Review,
                EventOperation::Update,
            ))
            .await
    }

    /// Record that `author_id` deleted a review and drop every mark on it.
    ///
    /// Call this while the review is still in the entity store. Returns the
    /// number of marks removed, or `None` if the review was already deleted.
    /// Once deleted, the review is refused by every other operation here.
    pub async fn review_deleted(
        &self,
        author_id: UserId,
        review_id: ReviewId,
    ) -> AppResult<Option<u64>> {
        self.entity_store.ensure_user(author_id).await?;
        self.entity_store.ensure_review(review_id).await?;

        let txn = self.mark_repo.begin().await?;

        if !self
            .mark_repo
            .insert_deleted(&txn, review_id, author_id)
            .await?
        {
            tracing::debug!(author_id, review_id, "Review already deleted");
            return Ok(None);
        }

        let removed = self.mark_repo.delete_by_review(&txn, review_id).await?;
        self.activity_feed
            .record_in(
                &txn,
                NewEvent::now(
                    author_id,
                    review_id,
                    EventSubject::Review,
                    EventOperation::Remove,
                ),
            )
            .await?;
        commit(txn).await?;

        tracing::info!(author_id, review_id, marks_removed = removed, "Review deleted");
        Ok(Some(removed))
    }

    async fn ensure_live_review(&self, review_id: ReviewId) -> AppResult<()> {
        self.entity_store.ensure_review(review_id).await?;
        if self.mark_repo.is_deleted(review_id).await? {
            return Err(AppError::review_not_found(review_id));
        }
        Ok(())
    }
}
