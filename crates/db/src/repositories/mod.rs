//! Repositories for database access.
//!
//! Mutating methods take the connection to run on, so a service can group an
//! edge mutation and its event append in one transaction.

pub mod feed_event;
pub mod film_like;
pub mod friendship;
pub mod review_mark;

pub use feed_event::{FeedEventRepository, NewFeedEvent};
pub use film_like::FilmLikeRepository;
pub use friendship::FriendshipRepository;
pub use review_mark::ReviewMarkRepository;

use filmgraph_common::{AppError, AppResult};
use sea_orm::DatabaseTransaction;

/// Commit a transaction opened by one of the repositories.
pub async fn commit(txn: DatabaseTransaction) -> AppResult<()> {
    txn.commit()
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
