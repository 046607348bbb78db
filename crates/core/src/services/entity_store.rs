//! Entity store abstraction.
//!
//! Users, films and reviews live in an external store. The services only need to
//! know whether an id exists and which films belong to a genre or a release year.

use async_trait::async_trait;
use filmgraph_common::{AppError, AppResult, FilmId, GenreId, ReviewId, UserId};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Read access to the externally owned entities.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Check if a user exists.
    async fn user_exists(&self, id: UserId) -> AppResult<bool>;

    /// Check if a film exists.
    async fn film_exists(&self, id: FilmId) -> AppResult<bool>;

    /// Check if a review exists.
    async fn review_exists(&self, id: ReviewId) -> AppResult<bool>;

    /// Every film in the catalog.
    async fn film_ids(&self) -> AppResult<BTreeSet<FilmId>>;

    /// Films tagged with a genre.
    async fn films_by_genre(&self, genre_id: GenreId) -> AppResult<BTreeSet<FilmId>>;

    /// Films released in a year.
    async fn films_by_year(&self, year: i32) -> AppResult<BTreeSet<FilmId>>;

    /// Fail with `NotFound` unless the user exists.
    async fn ensure_user(&self, id: UserId) -> AppResult<()> {
        if self.user_exists(id).await? {
            Ok(())
        } else {
            Err(AppError::user_not_found(id))
        }
    }

    /// Fail with `NotFound` unless the film exists.
    async fn ensure_film(&self, id: FilmId) -> AppResult<()> {
        if self.film_exists(id).await? {
            Ok(())
        } else {
            Err(AppError::film_not_found(id))
        }
    }

    /// Fail with `NotFound` unless the review exists.
    async fn ensure_review(&self, id: ReviewId) -> AppResult<()> {
        if self.review_exists(id).await? {
            Ok(())
        } else {
            Err(AppError::review_not_found(id))
        }
    }
}

#[derive(Debug, Clone, Default)]
struct FilmRecord {
    genres: BTreeSet<GenreId>,
    year: Option<i32>,
}

#[derive(Debug, Default)]
struct Catalog {
    users: BTreeSet<UserId>,
    films: HashMap<FilmId, FilmRecord>,
    reviews: BTreeSet<ReviewId>,
}

/// In-memory entity store.
///
/// Cloning shares the underlying catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityStore {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryEntityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user.
    pub async fn add_user(&self, id: UserId) {
        self.catalog.write().await.users.insert(id);
    }

    /// Register a film with its genres and optional release year.
    pub async fn add_film(
        &self,
        id: FilmId,
        genres: impl IntoIterator<Item = GenreId> + Send,
        year: Option<i32>,
    ) {
        let record = FilmRecord {
            genres: genres.into_iter().collect(),
            year,
        };
        self.catalog.write().await.films.insert(id, record);
    }

    /// Register a review.
    pub async fn add_review(&self, id: ReviewId) {
        self.catalog.write().await.reviews.insert(id);
    }

    /// Forget a review. Returns `true` if it was registered.
    pub async fn remove_review(&self, id: ReviewId) -> bool {
        self.catalog.write().await.reviews.remove(&id)
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn user_exists(&self, id: UserId) -> AppResult<bool> {
        Ok(self.catalog.read().await.users.contains(&id))
    }

    async fn film_exists(&self, id: FilmId) -> AppResult<bool> {
        Ok(self.catalog.read().await.films.contains_key(&id))
    }

    async fn review_exists(&self, id: ReviewId) -> AppResult<bool> {
        Ok(self.catalog.read().await.reviews.contains(&id))
    }

    async fn film_ids(&self) -> AppResult<BTreeSet<FilmId>> {
        Ok(self.catalog.read().await.films.keys().copied().collect())
    }

    async fn films_by_genre(&self, genre_id: GenreId) -> AppResult<BTreeSet<FilmId>> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .films
            .iter()
            .filter(|(_, film)| film.genres.contains(&genre_id))
            .map(|(id, _)| *id)
            .collect())
    }

    async fn films_by_year(&self, year: i32) -> AppResult<BTreeSet<FilmId>> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .films
            .iter()
            .filter(|(_, film)| film.year == Some(year))
            .map(|(id, _)| *id)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use filmgraph_common::EntityKind;
    use maplit::btreeset;

    async fn create_test_store() -> InMemoryEntityStore {
        let store = InMemoryEntityStore::new();
        store.add_user(1).await;
        store.add_film(10, [1, 2], Some(1999)).await;
        store.add_film(11, [2], Some(2004)).await;
        store.add_film(12, [], None).await;
        store.add_review(100).await;
        store
    }

    #[tokio::test]
    async fn test_existence_checks() {
        let store = create_test_store().await;

        assert!(store.user_exists(1).await.unwrap());
        assert!(!store.user_exists(2).await.unwrap());
        assert!(store.film_exists(12).await.unwrap());
        assert!(store.review_exists(100).await.unwrap());
    }

    #[tokio::test]
    async fn test_film_filters() {
        let store = create_test_store().await;

        assert_eq!(store.film_ids().await.unwrap(), btreeset! {10, 11, 12});
        assert_eq!(store.films_by_genre(2).await.unwrap(), btreeset! {10, 11});
        assert_eq!(store.films_by_genre(1).await.unwrap(), btreeset! {10});
        assert_eq!(store.films_by_year(2004).await.unwrap(), btreeset! {11});
        assert!(store.films_by_year(2020).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_reports_kind_and_id() {
        let store = create_test_store().await;

        assert!(store.ensure_user(1).await.is_ok());
        match store.ensure_film(99).await.unwrap_err() {
            AppError::NotFound { kind, id } => {
                assert_eq!(kind, EntityKind::Film);
                assert_eq!(id, 99);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clones_share_catalog() {
        let store = create_test_store().await;
        let other = store.clone();

        assert!(other.remove_review(100).await);
        assert!(!store.review_exists(100).await.unwrap());
        assert!(!store.remove_review(100).await);
    }
}
