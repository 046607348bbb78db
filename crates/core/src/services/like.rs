//! Like service.

use crate::services::activity_feed::{ActivityFeedService, EventOperation, EventSubject, NewEvent};
use crate::services::entity_store::EntityStore;
use filmgraph_common::{AppError, AppResult, FilmId, GenreId, UserId, config::PopularConfig};
use filmgraph_db::repositories::{FilmLikeRepository, commit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Filters for [`LikeService::most_popular`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PopularityQuery {
    /// Only films tagged with this genre.
    pub genre_id: Option<GenreId>,
    /// Only films released in this year.
    pub year: Option<i32>,
    /// Maximum number of films; the configured default when absent.
    pub limit: Option<u64>,
}

/// A film and the number of users who like it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilmPopularity {
    /// The film.
    pub film_id: FilmId,
    /// Distinct likers.
    pub likes: u64,
}

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: FilmLikeRepository,
    entity_store: Arc<dyn EntityStore>,
    activity_feed: ActivityFeedService,
    config: PopularConfig,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub fn new(
        like_repo: FilmLikeRepository,
        entity_store: Arc<dyn EntityStore>,
        activity_feed: ActivityFeedService,
        config: PopularConfig,
    ) -> Self {
        Self {
            like_repo,
            entity_store,
            activity_feed,
            config,
        }
    }

    /// Like a film. Returns `true` if the like is new.
    pub async fn like(&self, user_id: UserId, film_id: FilmId) -> AppResult<bool> {
        self.entity_store.ensure_user(user_id).await?;
        self.entity_store.ensure_film(film_id).await?;

        let txn = self.like_repo.begin().await?;

        if !self.like_repo.insert(&txn, user_id, film_id).await? {
            tracing::debug!(user_id, film_id, "Film already liked");
            return Ok(false);
        }

        self.activity_feed
            .record_in(
                &txn,
                NewEvent::now(user_id, film_id, EventSubject::Like, EventOperation::Add),
            )
            .await?;
        commit(txn).await?;

        tracing::info!(user_id, film_id, "Film liked");
        Ok(true)
    }

    /// Remove a like. Returns `true` if the user liked the film.
    pub async fn unlike(&self, user_id: UserId, film_id: FilmId) -> AppResult<bool> {
        self.entity_store.ensure_user(user_id).await?;
        self.entity_store.ensure_film(film_id).await?;

        let txn = self.like_repo.begin().await?;

        if !self.like_repo.delete(&txn, user_id, film_id).await? {
            tracing::debug!(user_id, film_id, "Film was not liked");
            return Ok(false);
        }

        self.activity_feed
            .record_in(
                &txn,
                NewEvent::now(user_id, film_id, EventSubject::Like, EventOperation::Remove),
            )
            .await?;
        commit(txn).await?;

        tracing::info!(user_id, film_id, "Film unliked");
        Ok(true)
    }

    /// Most liked films, optionally restricted to a genre and a release year.
    ///
    /// Films nobody likes take part with a count of zero. Ties go to the lower film id.
    pub async fn most_popular(&self, query: PopularityQuery) -> AppResult<Vec<FilmPopularity>> {
        let limit = match query.limit {
            Some(0) => {
                return Err(AppError::BadRequest(
                    "Limit must be greater than zero".to_string(),
                ));
            }
            Some(n) => n,
            None => self.config.default_limit,
        };

        let mut films = self.entity_store.film_ids().await?;
        if let Some(genre_id) = query.genre_id {
            let in_genre = self.entity_store.films_by_genre(genre_id).await?;
            films.retain(|id| in_genre.contains(id));
        }
        if let Some(year) = query.year {
            let in_year = self.entity_store.films_by_year(year).await?;
            films.retain(|id| in_year.contains(id));
        }
        if films.is_empty() {
            return Ok(Vec::new());
        }

        let counts = self.like_repo.like_counts().await?;
        let mut ranked: Vec<FilmPopularity> = films
            .into_iter()
            .map(|film_id| FilmPopularity {
                film_id,
                likes: counts.get(&film_id).copied().unwrap_or(0),
            })
            .collect();

        // `films` is ascending, so a stable sort keeps ties in id order.
        ranked.sort_by(|a, b| b.likes.cmp(&a.likes));
        ranked.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

        Ok(ranked)
    }

    /// Users who like a film.
    pub async fn likers_of(&self, film_id: FilmId) -> AppResult<BTreeSet<UserId>> {
        self.like_repo.likers_of(film_id).await
    }

    /// Films a user likes.
    pub async fn liked_films_of(&self, user_id: UserId) -> AppResult<BTreeSet<FilmId>> {
        self.like_repo.liked_films_of(user_id).await
    }

    /// Number of users who like a film.
    pub async fn like_count(&self, film_id: FilmId) -> AppResult<u64> {
        self.like_repo.count_by_film(film_id).await
    }

    pub(crate) async fn co_likers(
        &self,
        user_id: UserId,
        film_ids: &BTreeSet<FilmId>,
    ) -> AppResult<BTreeSet<UserId>> {
        self.like_repo.co_likers(user_id, film_ids).await
    }

    pub(crate) async fn films_liked_by_any(
        &self,
        user_ids: &BTreeSet<UserId>,
        excluded: &BTreeSet<FilmId>,
    ) -> AppResult<BTreeSet<FilmId>> {
        self.like_repo.films_liked_by_any(user_ids, excluded).await
    }
}
