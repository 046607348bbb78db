//! Film like repository.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::entities::{FilmLike, film_like};
use chrono::Utc;
use filmgraph_common::{AppError, AppResult, FilmId, UserId};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};

/// Film like repository for database operations.
#[derive(Clone)]
pub struct FilmLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl FilmLikeRepository {
    /// Create a new film like repository.
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

    /// Insert a like unless it already exists.
    ///
    /// Returns `true` if the like was created.
    pub async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: UserId,
        film_id: FilmId,
    ) -> AppResult<bool> {
        let model = film_like::ActiveModel {
            user_id: Set(user_id),
            film_id: Set(film_id),
            created_at: Set(Utc::now().into()),
        };

        let inserted = FilmLike::insert(model)
            .on_conflict(
                OnConflict::columns([film_like::Column::UserId, film_like::Column::FilmId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted == 1)
    }

    /// Delete a like by user and film.
    ///
    /// Returns `true` if a like existed.
    pub async fn delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: UserId,
        film_id: FilmId,
    ) -> AppResult<bool> {
        let result = FilmLike::delete_many()
            .filter(film_like::Column::UserId.eq(user_id))
            .filter(film_like::Column::FilmId.eq(film_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Users who like a film.
    pub async fn likers_of(&self, film_id: FilmId) -> AppResult<BTreeSet<UserId>> {
        let ids = FilmLike::find()
            .select_only()
            .column(film_like::Column::UserId)
            .filter(film_like::Column::FilmId.eq(film_id))
            .into_tuple::<i64>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(ids.into_iter().collect())
    }

    /// Films a user likes.
    pub async fn liked_films_of(&self, user_id: UserId) -> AppResult<BTreeSet<FilmId>> {
        let ids = FilmLike::find()
            .select_only()
            .column(film_like::Column::FilmId)
            .filter(film_like::Column::UserId.eq(user_id))
            .into_tuple::<i64>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(ids.into_iter().collect())
    }

    /// Count likes on a film.
    pub async fn count_by_film(&self, film_id: FilmId) -> AppResult<u64> {
        FilmLike::find()
            .filter(film_like::Column::FilmId.eq(film_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of likers per film. Films without likes are absent from the map.
    pub async fn like_counts(&self) -> AppResult<HashMap<FilmId, u64>> {
        let rows = FilmLike::find()
            .select_only()
            .column(film_like::Column::FilmId)
            .column_as(Expr::col(film_like::Column::UserId).count(), "likes")
            .group_by(film_like::Column::FilmId)
            .into_tuple::<(i64, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(film_id, likes)| (film_id, likes.max(0) as u64))
            .collect())
    }

    /// Users other than `user_id` who like at least one of `film_ids`.
    pub async fn co_likers(
        &self,
        user_id: UserId,
        film_ids: &BTreeSet<FilmId>,
    ) -> AppResult<BTreeSet<UserId>> {
        if film_ids.is_empty() {
            return Ok(BTreeSet::new());
        }

        let ids = FilmLike::find()
            .select_only()
            .column(film_like::Column::UserId)
            .distinct()
            .filter(film_like::Column::FilmId.is_in(film_ids.iter().copied()))
            .filter(film_like::Column::UserId.ne(user_id))
            .into_tuple::<i64>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(ids.into_iter().collect())
    }

    /// Films liked by any of `user_ids`, leaving out `excluded`.
    pub async fn films_liked_by_any(
        &self,
        user_ids: &BTreeSet<UserId>,
        excluded: &BTreeSet<FilmId>,
    ) -> AppResult<BTreeSet<FilmId>> {
        if user_ids.is_empty() {
            return Ok(BTreeSet::new());
        }

        let mut query = FilmLike::find()
            .select_only()
            .column(film_like::Column::FilmId)
            .distinct()
            .filter(film_like::Column::UserId.is_in(user_ids.iter().copied()));

        if !excluded.is_empty() {
            query = query.filter(film_like::Column::FilmId.is_not_in(excluded.iter().copied()));
        }

        let ids = query
            .into_tuple::<i64>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(ids.into_iter().collect())
    }
}
