//! Feed event repository.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::entities::{
    FeedEvent,
    feed_event::{self, EventOperation, EventSubject},
};
use chrono::Utc;
use filmgraph_common::{AppError, AppResult, EventId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, prelude::DateTimeWithTimeZone,
};

/// An event that has not been appended yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedEvent {
    /// The user whose action produced the event.
    pub actor_id: UserId,
    /// The film, friend or review the action targets.
    pub entity_id: i64,
    /// When the action happened.
    pub occurred_on: DateTimeWithTimeZone,
    /// What the event is about.
    pub subject: EventSubject,
    /// What happened.
    pub operation: EventOperation,
}

impl NewFeedEvent {
    /// An event stamped with the current time.
    #[must_use]
    pub fn now(
        actor_id: UserId,
        entity_id: i64,
        subject: EventSubject,
        operation: EventOperation,
    ) -> Self {
        Self {
            actor_id,
            entity_id,
            occurred_on: Utc::now().into(),
            subject,
            operation,
        }
    }
}

/// Feed event repository for database operations.
#[derive(Clone)]
pub struct FeedEventRepository {
    db: Arc<DatabaseConnection>,
}

impl FeedEventRepository {
    /// Create a new feed event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// The connection this repository reads from.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Append an event. The returned model carries the id assigned by the database.
    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        event: NewFeedEvent,
    ) -> AppResult<feed_event::Model> {
        let model = feed_event::ActiveModel {
            id: NotSet,
            actor_id: Set(event.actor_id),
            entity_id: Set(event.entity_id),
            occurred_on: Set(event.occurred_on),
            subject: Set(event.subject),
            operation: Set(event.operation),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: EventId) -> AppResult<Option<feed_event::Model>> {
        FeedEvent::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Events produced by any of `actor_ids`, newest first.
    ///
    /// Events sharing a timestamp are ordered by descending id, i.e. append order reversed.
    /// Without a `limit` every matching event is returned.
    pub async fn find_by_actors(
        &self,
        actor_ids: &BTreeSet<UserId>,
        limit: Option<u64>,
    ) -> AppResult<Vec<feed_event::Model>> {
        if actor_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = FeedEvent::find()
            .filter(feed_event::Column::ActorId.is_in(actor_ids.iter().copied()));
        Self::newest_first(query, limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Events produced by one actor, newest first.
    pub async fn find_by_actor(
        &self,
        actor_id: UserId,
        limit: Option<u64>,
    ) -> AppResult<Vec<feed_event::Model>> {
        let query = FeedEvent::find().filter(feed_event::Column::ActorId.eq(actor_id));
        Self::newest_first(query, limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn newest_first(query: Select<FeedEvent>, limit: Option<u64>) -> Select<FeedEvent> {
        let query = query
            .order_by_desc(feed_event::Column::OccurredOn)
            .order_by_desc(feed_event::Column::Id);
        match limit {
            Some(limit) => query.limit(limit),
            None => query,
        }
    }
}
