//! Friendship service.
//!
//! Each unordered pair of users is in one of three states: no edge, pending
//! (invited by one side) or confirmed. Confirming and removing an edge are
//! recorded in the activity feed; sending an invite is not.

use crate::services::activity_feed::{ActivityFeedService, EventOperation, EventSubject, NewEvent};
use crate::services::entity_store::EntityStore;
use filmgraph_common::{AppError, AppResult, UserId};
use filmgraph_db::repositories::{FriendshipRepository, commit};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Outcome of a [`FriendshipService::make_friends`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipTransition {
    /// A pending invite was created.
    Invited,
    /// A pending invite from the other side was confirmed.
    Confirmed,
    /// Nothing changed.
    Unchanged,
}

/// State of the edge between two users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FriendshipState {
    /// No edge.
    None,
    /// Invited by `inviter`, not yet confirmed.
    Pending {
        /// The user who sent the invite.
        inviter: UserId,
    },
    /// Both sides agreed.
    Confirmed,
}

/// Friendship service for business logic.
#[derive(Clone)]
pub struct FriendshipService {
    friendship_repo: FriendshipRepository,
    entity_store: Arc<dyn EntityStore>,
    activity_feed: ActivityFeedService,
}

impl FriendshipService {
    /// Create a new friendship service.
    #[must_use]
    pub fn new(
        friendship_repo: FriendshipRepository,
        entity_store: Arc<dyn EntityStore>,
        activity_feed: ActivityFeedService,
    ) -> Self {
        Self {
            friendship_repo,
            entity_store,
            activity_feed,
        }
    }

    /// Invite `acceptor_id`, or confirm the invite `acceptor_id` already sent.
    ///
    /// Only the confirmation appends a `FRIEND/ADD` event, with the confirming
    /// user as actor. Sending an invite changes the state but records nothing,
    /// so a pending invite never shows up in anyone's feed.
    pub async fn make_friends(
        &self,
        inviter_id: UserId,
        acceptor_id: UserId,
    ) -> AppResult<FriendshipTransition> {
        if inviter_id == acceptor_id {
            tracing::warn!(user_id = inviter_id, "Refused self-friendship");
            return Err(AppError::BadRequest("Cannot befriend yourself".to_string()));
        }
        self.entity_store.ensure_user(inviter_id).await?;
        self.entity_store.ensure_user(acceptor_id).await?;

        let txn = self.friendship_repo.begin().await?;

        if self
            .friendship_repo
            .insert_pending(&txn, inviter_id, acceptor_id)
            .await?
        {
            commit(txn).await?;
            tracing::info!(inviter_id, acceptor_id, "Friend request sent");
            return Ok(FriendshipTransition::Invited);
        }

        // An edge exists. It can only move forward if the other side invited us.
        if self
            .friendship_repo
            .confirm(&txn, inviter_id, acceptor_id)
            .await?
        {
            self.activity_feed
                .record_in(
                    &txn,
                    NewEvent::now(
                        inviter_id,
                        acceptor_id,
                        EventSubject::Friend,
                        EventOperation::Add,
                    ),
                )
                .await?;
            commit(txn).await?;
            tracing::info!(
                confirmer_id = inviter_id,
                inviter_id = acceptor_id,
                "Friendship confirmed"
            );
            return Ok(FriendshipTransition::Confirmed);
        }

        tracing::debug!(inviter_id, acceptor_id, "Friendship unchanged");
        Ok(FriendshipTransition::Unchanged)
    }

    /// Remove the edge between two users in any state.
    ///
    /// Returns `true` if an edge existed.
    pub async fn unfriend(&self, user_id: UserId, other_id: UserId) -> AppResult<bool> {
        self.entity_store.ensure_user(user_id).await?;
        self.entity_store.ensure_user(other_id).await?;

        let txn = self.friendship_repo.begin().await?;

        if !self
            .friendship_repo
            .delete_by_pair(&txn, user_id, other_id)
            .await?
        {
            tracing::debug!(user_id, other_id, "No friendship to remove");
            return Ok(false);
        }

        self.activity_feed
            .record_in(
                &txn,
                NewEvent::now(
                    user_id,
                    other_id,
                    EventSubject::Friend,
                    EventOperation::Remove,
                ),
            )
            .await?;
        commit(txn).await?;

        tracing::info!(user_id, other_id, "Friendship removed");
        Ok(true)
    }

    /// State of the edge between two users.
    pub async fn friendship_state(&self, a: UserId, b: UserId) -> AppResult<FriendshipState> {
        let state = match self.friendship_repo.find_by_pair(a, b).await? {
            None => FriendshipState::None,
            Some(edge) if edge.confirmed => FriendshipState::Confirmed,
            Some(edge) => FriendshipState::Pending {
                inviter: edge.inviter_id,
            },
        };
        Ok(state)
    }

    /// Users the given user sees as friends: confirmed friends plus users the
    /// given user invited and who have not answered yet.
    pub async fn friends_of(&self, user_id: UserId) -> AppResult<BTreeSet<UserId>> {
        self.entity_store.ensure_user(user_id).await?;
        self.friendship_repo.friend_ids_of(user_id).await
    }

    /// Users both `a` and `b` see as friends.
    pub async fn common_friends(&self, a: UserId, b: UserId) -> AppResult<BTreeSet<UserId>> {
        let of_a = self.friends_of(a).await?;
        let of_b = self.friends_of(b).await?;
        Ok(of_a.intersection(&of_b).copied().collect())
    }

    /// Users whose invite to the given user is still pending.
    pub async fn incoming_requests(&self, user_id: UserId) -> AppResult<BTreeSet<UserId>> {
        self.entity_store.ensure_user(user_id).await?;
        self.friendship_repo.incoming_request_ids(user_id).await
    }
}
