//! Review mark repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{DeletedReview, ReviewMark, deleted_review, review_mark};
use chrono::Utc;
use filmgraph_common::{AppError, AppResult, ReviewId, UserId};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};

/// Review mark repository for database operations.
#[derive(Clone)]
pub struct ReviewMarkRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewMarkRepository {
    /// Create a new review mark repository.
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

    /// Insert a mark unless the user already holds one on the review.
    ///
    /// Returns `true` if the mark was created.
    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: UserId,
        review_id: ReviewId,
        is_useful: bool,
    ) -> AppResult<bool> {
        let model = review_mark::ActiveModel {
            user_id: Set(user_id),
            review_id: Set(review_id),
            is_useful: Set(is_useful),
            created_at: Set(Utc::now().into()),
        };

        let inserted = ReviewMark::insert(model)
            .on_conflict(
                OnConflict::columns([review_mark::Column::UserId, review_mark::Column::ReviewId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted == 1)
    }

    /// Flip an existing mark to `is_useful`.
    ///
    /// Returns `true` only if the stored polarity differed.
    pub async fn set_polarity<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: UserId,
        review_id: ReviewId,
        is_useful: bool,
    ) -> AppResult<bool> {
        let result = ReviewMark::update_many()
            .col_expr(review_mark::Column::IsUseful, Expr::value(is_useful))
            .filter(review_mark::Column::UserId.eq(user_id))
            .filter(review_mark::Column::ReviewId.eq(review_id))
            .filter(review_mark::Column::IsUseful.ne(is_useful))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected == 1)
    }

    /// Delete a user's mark on a review.
    ///
    /// Returns `true` if a mark existed.
    pub async fn delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: UserId,
        review_id: ReviewId,
    ) -> AppResult<bool> {
        let result = ReviewMark::delete_many()
            .filter(review_mark::Column::UserId.eq(user_id))
            .filter(review_mark::Column::ReviewId.eq(review_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Delete every mark on a review. Returns the number of marks removed.
    pub async fn delete_by_review<C: ConnectionTrait>(
        &self,
        conn: &C,
        review_id: ReviewId,
    ) -> AppResult<u64> {
        let result = ReviewMark::delete_many()
            .filter(review_mark::Column::ReviewId.eq(review_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Record that a review was deleted.
    ///
    /// Returns `true` only for the first deletion of the review.
    pub async fn insert_deleted<C: ConnectionTrait>(
        &self,
        conn: &C,
        review_id: ReviewId,
        author_id: UserId,
    ) -> AppResult<bool> {
        let model = deleted_review::ActiveModel {
            review_id: Set(review_id),
            author_id: Set(author_id),
            deleted_at: Set(Utc::now().into()),
        };

        let inserted = DeletedReview::insert(model)
            .on_conflict(
                OnConflict::column(deleted_review::Column::ReviewId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted == 1)
    }

    /// Whether the review has been deleted.
    pub async fn is_deleted(&self, review_id: ReviewId) -> AppResult<bool> {
        let found = DeletedReview::find_by_id(review_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }

    /// Useful minus not-useful marks for each of `review_ids`.
    ///
    /// Reviews without marks are absent from the map.
    pub async fn usefulness_of(
        &self,
        review_ids: &[ReviewId],
    ) -> AppResult<HashMap<ReviewId, i64>> {
        if review_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = ReviewMark::find()
            .select_only()
            .column(review_mark::Column::ReviewId)
            .column(review_mark::Column::IsUseful)
            .column_as(Expr::col(review_mark::Column::UserId).count(), "marks")
            .filter(review_mark::Column::ReviewId.is_in(review_ids.iter().copied()))
            .group_by(review_mark::Column::ReviewId)
            .group_by(review_mark::Column::IsUseful)
            .into_tuple::<(i64, bool, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut scores = HashMap::new();
        for (review_id, is_useful, marks) in rows {
            let delta = if is_useful { marks } else { -marks };
            *scores.entry(review_id).or_insert(0) += delta;
        }
        Ok(scores)
    }
}
