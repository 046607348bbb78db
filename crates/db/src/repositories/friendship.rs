//! Friendship repository.
//!
//! Every state transition is a single conditional statement whose affected-row
//! count tells the caller whether the transition happened. Mutations take the
//! connection to run on so the caller can group them with an event append in one
//! transaction.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::entities::{Friendship, friendship};
use chrono::Utc;
use filmgraph_common::{AppError, AppResult, UserId};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};

/// Friendship repository for database operations.
#[derive(Clone)]
pub struct FriendshipRepository {
    db: Arc<DatabaseConnection>,
}

impl FriendshipRepository {
    /// Create a new friendship repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Start a transaction on the underlying connection.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the edge between two users, in either direction.
    pub async fn find_by_pair(
        &self,
        a: UserId,
        b: UserId,
    ) -> AppResult<Option<friendship::Model>> {
        let (low, high) = friendship::pair_key(a, b);
        Friendship::find_by_id((low, high))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a pending edge unless any edge already exists for the pair.
    ///
    /// Returns `true` if the edge was created.
    pub async fn insert_pending<C: ConnectionTrait>(
        &self,
        conn: &C,
        inviter_id: UserId,
        acceptor_id: UserId,
    ) -> AppResult<bool> {
        let (low, high) = friendship::pair_key(inviter_id, acceptor_id);
        let model = friendship::ActiveModel {
            user_low: Set(low),
            user_high: Set(high),
            inviter_id: Set(inviter_id),
            confirmed: Set(false),
            created_at: Set(Utc::now().into()),
        };

        let inserted = Friendship::insert(model)
            .on_conflict(
                OnConflict::columns([friendship::Column::UserLow, friendship::Column::UserHigh])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted == 1)
    }

    /// Confirm a pending edge that `inviter_id` sent to `confirmer_id`.
    ///
    /// Returns `true` only if the edge was pending with that inviter; confirmed
    /// edges and the inviter repeating their own invite are left untouched.
    pub async fn confirm<C: ConnectionTrait>(
        &self,
        conn: &C,
        confirmer_id: UserId,
        inviter_id: UserId,
    ) -> AppResult<bool> {
        let (low, high) = friendship::pair_key(confirmer_id, inviter_id);
        let result = Friendship::update_many()
            .col_expr(friendship::Column::Confirmed, Expr::value(true))
            .filter(friendship::Column::UserLow.eq(low))
            .filter(friendship::Column::UserHigh.eq(high))
            .filter(friendship::Column::InviterId.eq(inviter_id))
            .filter(friendship::Column::Confirmed.eq(false))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected == 1)
    }

    /// Delete the edge between two users in any state.
    ///
    /// Returns `true` if an edge existed.
    pub async fn delete_by_pair<C: ConnectionTrait>(
        &self,
        conn: &C,
        a: UserId,
        b: UserId,
    ) -> AppResult<bool> {
        let (low, high) = friendship::pair_key(a, b);
        let result = Friendship::delete_many()
            .filter(friendship::Column::UserLow.eq(low))
            .filter(friendship::Column::UserHigh.eq(high))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Ids the user sees as friends: confirmed edges plus the user's own
    /// outgoing pending invites.
    pub async fn friend_ids_of(&self, user_id: UserId) -> AppResult<BTreeSet<UserId>> {
        let edges = Friendship::find()
            .filter(touches(user_id))
            .filter(
                Condition::any()
                    .add(friendship::Column::Confirmed.eq(true))
                    .add(friendship::Column::InviterId.eq(user_id)),
            )
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(edges.iter().map(|e| e.other_party(user_id)).collect())
    }

    /// Ids of users whose invite to `user_id` is still pending.
    pub async fn incoming_request_ids(&self, user_id: UserId) -> AppResult<BTreeSet<UserId>> {
        let edges = Friendship::find()
            .filter(touches(user_id))
            .filter(friendship::Column::Confirmed.eq(false))
            .filter(friendship::Column::InviterId.ne(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(edges.iter().map(|e| e.inviter_id).collect())
    }
}

fn touches(user_id: UserId) -> Condition {
    Condition::any()
        .add(friendship::Column::UserLow.eq(user_id))
        .add(friendship::Column::UserHigh.eq(user_id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_friendship(inviter: i64, acceptor: i64, confirmed: bool) -> friendship::Model {
        let (user_low, user_high) = friendship::pair_key(inviter, acceptor);
        friendship::Model {
            user_low,
            user_high,
            inviter_id: inviter,
            confirmed,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let edge = create_test_friendship(5, 2, false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge.clone()]])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db);
        let found = repo.find_by_pair(2, 5).await.unwrap().unwrap();

        assert_eq!(found.inviter_id, 5);
        assert_eq!(found.acceptor_id(), 2);
        assert!(!found.confirmed);
    }

    #[tokio::test]
    async fn test_find_by_pair_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<friendship::Model>::new()])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db);
        let result = repo.find_by_pair(1, 3).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_insert_pending_reports_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db.clone());
        assert!(repo.insert_pending(db.as_ref(), 1, 2).await.unwrap());
        assert!(!repo.insert_pending(db.as_ref(), 2, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_confirm_and_delete_report_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db.clone());
        assert!(repo.confirm(db.as_ref(), 2, 1).await.unwrap());
        assert!(!repo.delete_by_pair(db.as_ref(), 1, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_friend_ids_of_maps_other_party() {
        let outgoing = create_test_friendship(1, 4, false);
        let confirmed = create_test_friendship(7, 1, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[outgoing, confirmed]])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db);
        let friends = repo.friend_ids_of(1).await.unwrap();

        assert_eq!(friends, BTreeSet::from([4, 7]));
    }

    #[tokio::test]
    async fn test_incoming_request_ids() {
        let incoming = create_test_friendship(9, 1, false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[incoming]])
                .into_connection(),
        );

        let repo = FriendshipRepository::new(db);
        let requests = repo.incoming_request_ids(1).await.unwrap();

        assert_eq!(requests, BTreeSet::from([9]));
    }
}
