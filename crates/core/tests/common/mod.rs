//! Shared setup for the behavioural tests.

#![allow(dead_code, clippy::unwrap_used)]

use filmgraph_common::Config;
use filmgraph_core::{CoreServices, EntityStore, Event, InMemoryEntityStore};
use filmgraph_db::test_utils::TestDatabase;
use std::sync::Arc;

/// Services over a fresh in-memory database.
pub struct Harness {
    pub db: TestDatabase,
    pub store: InMemoryEntityStore,
    pub services: CoreServices,
}

/// Users 1 to 5, films 10 to 13 and reviews 100 to 102.
///
/// | film | genres | year |
/// |------|--------|------|
/// | 10   | 1      | 1999 |
/// | 11   | 2      | 1999 |
/// | 12   | 1, 2   | 2004 |
/// | 13   | 1      | 2004 |
pub async fn setup() -> Harness {
    let db = TestDatabase::in_memory().await.unwrap();

    let store = InMemoryEntityStore::new();
    for user_id in 1..=5 {
        store.add_user(user_id).await;
    }
    store.add_film(10, [1], Some(1999)).await;
    store.add_film(11, [2], Some(1999)).await;
    store.add_film(12, [1, 2], Some(2004)).await;
    store.add_film(13, [1], Some(2004)).await;
    for review_id in 100..=102 {
        store.add_review(review_id).await;
    }

    let config = Config::from_toml_str(
        r#"
        [database]
        url = "sqlite::memory:"
        "#,
    )
    .unwrap();

    let entity_store: Arc<dyn EntityStore> = Arc::new(store.clone());
    let services = CoreServices::new(db.connection(), entity_store, &config);

    Harness {
        db,
        store,
        services,
    }
}

/// Every event a user produced, newest first.
pub async fn events_of(harness: &Harness, user_id: i64) -> Vec<Event> {
    harness
        .services
        .activity_feed
        .events_by(user_id, None)
        .await
        .unwrap()
}
