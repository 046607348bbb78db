//! Activity feed service.
//!
//! Append-only log of graph mutations. The other services append through
//! [`ActivityFeedService::record_in`] with their open transaction, so an edge
//! change and its event commit or roll back together.

use crate::services::entity_store::EntityStore;
use filmgraph_common::{AppError, AppResult, EventId, UserId, config::FeedConfig};
use filmgraph_db::{
    entities::feed_event,
    repositories::{FeedEventRepository, FriendshipRepository},
};
use sea_orm::ConnectionTrait;
use std::sync::Arc;

pub use filmgraph_db::entities::feed_event::{EventOperation, EventSubject};
pub use filmgraph_db::repositories::NewFeedEvent as NewEvent;

/// A recorded event.
pub type Event = feed_event::Model;

/// Activity feed service for business logic.
#[derive(Clone)]
pub struct ActivityFeedService {
    event_repo: FeedEventRepository,
    friendship_repo: FriendshipRepository,
    entity_store: Arc<dyn EntityStore>,
    config: FeedConfig,
}

impl ActivityFeedService {
    /// Create a new activity feed service.
    #[must_use]
    pub fn new(
        event_repo: FeedEventRepository,
        friendship_repo: FriendshipRepository,
        entity_store: Arc<dyn EntityStore>,
        config: FeedConfig,
    ) -> Self {
        Self {
            event_repo,
            friendship_repo,
            entity_store,
            config,
        }
    }

    /// Append an event on its own.
    pub async fn record(&self, event: NewEvent) -> AppResult<Event> {
        self.record_in(self.event_repo.connection(), event).await
    }

    /// Append an event on `conn`, usually a transaction owned by the caller.
    pub async fn record_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        event: NewEvent,
    ) -> AppResult<Event> {
        let recorded = self
            .event_repo
            .insert(conn, event)
            .await
            .map_err(AppError::logged)?;

        tracing::debug!(
            event_id = recorded.id,
            actor_id = recorded.actor_id,
            entity_id = recorded.entity_id,
            subject = ?recorded.subject,
            operation = ?recorded.operation,
            "Recorded feed event"
        );
        Ok(recorded)
    }

    /// Events produced by the user's friends, newest first.
    ///
    /// Friends are resolved the way [`friends_of`] sees them, so outgoing pending
    /// invites count and incoming ones do not. The user's own events are excluded.
    /// Without a `limit` the whole feed is returned.
    ///
    /// [`friends_of`]: crate::services::friendship::FriendshipService::friends_of
    pub async fn feed_for(&self, user_id: UserId, limit: Option<u64>) -> AppResult<Vec<Event>> {
        self.entity_store.ensure_user(user_id).await?;
        let limit = self.resolve_limit(limit)?;

        let mut actors = self.friendship_repo.friend_ids_of(user_id).await?;
        actors.remove(&user_id);

        self.event_repo.find_by_actors(&actors, limit).await
    }

    /// A user's own events, newest first. Without a `limit` all of them are returned.
    pub async fn events_by(&self, actor_id: UserId, limit: Option<u64>) -> AppResult<Vec<Event>> {
        self.entity_store.ensure_user(actor_id).await?;
        let limit = self.resolve_limit(limit)?;

        self.event_repo.find_by_actor(actor_id, limit).await
    }

    /// Find an event by ID.
    pub async fn find_event(&self, id: EventId) -> AppResult<Option<Event>> {
        self.event_repo.find_by_id(id).await
    }

    fn resolve_limit(&self, limit: Option<u64>) -> AppResult<Option<u64>> {
        match limit {
            Some(0) => Err(AppError::BadRequest(
                "Limit must be greater than zero".to_string(),
            )),
            Some(n) => Ok(Some(n.min(self.config.max_limit))),
            None => Ok(None),
        }
    }
}
