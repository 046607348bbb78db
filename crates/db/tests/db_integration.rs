//! Database integration tests.
//!
//! The repository tests run against an in-memory SQLite database. Tests marked
//! `#[ignore]` require a running `PostgreSQL` instance.
//! Run them with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `filmgraph_test`)
//!   `TEST_DB_PASSWORD` (default: `filmgraph_test`)
//!   `TEST_DB_NAME` (default: `filmgraph_test`)

#![allow(clippy::unwrap_used)]

use chrono::{Duration, Utc};
use filmgraph_common::Config;
use filmgraph_db::entities::feed_event::{EventOperation, EventSubject};
use filmgraph_db::repositories::{
    FeedEventRepository, FilmLikeRepository, FriendshipRepository, NewFeedEvent,
    ReviewMarkRepository, commit,
};
use filmgraph_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::ConnectionTrait;
use std::collections::BTreeSet;

#[tokio::test]
async fn test_init_and_migrate_from_config() {
    let config = Config::from_toml_str(
        r#"
        [database]
        url = "sqlite::memory:"
        max_connections = 1
        "#,
    )
    .unwrap();

    let db = filmgraph_db::init(&config).await.unwrap();
    filmgraph_db::migrate(&db).await.unwrap();

    let repo = FilmLikeRepository::new(std::sync::Arc::new(db));
    assert!(repo.likers_of(10).await.unwrap().is_empty());
}

// === Friendship ===

#[tokio::test]
async fn test_friendship_pending_then_confirmed() {
    let db = TestDatabase::in_memory().await.unwrap();
    let repo = FriendshipRepository::new(db.connection());
    let conn = db.conn.as_ref();

    assert!(repo.insert_pending(conn, 7, 3).await.unwrap());
    assert!(!repo.insert_pending(conn, 3, 7).await.unwrap());

    let edge = repo.find_by_pair(3, 7).await.unwrap().unwrap();
    assert_eq!((edge.user_low, edge.user_high), (3, 7));
    assert_eq!(edge.inviter_id, 7);
    assert!(!edge.confirmed);

    // The inviter cannot confirm their own invite.
    assert!(!repo.confirm(conn, 7, 3).await.unwrap());
    assert_eq!(repo.friend_ids_of(3).await.unwrap(), BTreeSet::new());
    assert_eq!(repo.incoming_request_ids(3).await.unwrap(), BTreeSet::from([7]));

    assert!(repo.confirm(conn, 3, 7).await.unwrap());
    assert!(!repo.confirm(conn, 3, 7).await.unwrap());
    assert_eq!(repo.friend_ids_of(3).await.unwrap(), BTreeSet::from([7]));
    assert_eq!(repo.friend_ids_of(7).await.unwrap(), BTreeSet::from([3]));
    assert!(repo.incoming_request_ids(3).await.unwrap().is_empty());

    assert!(repo.delete_by_pair(conn, 3, 7).await.unwrap());
    assert!(repo.find_by_pair(7, 3).await.unwrap().is_none());
}

#[tokio::test]
async fn test_friendship_rejects_unordered_pair() {
    let db = TestDatabase::in_memory().await.unwrap();

    let result = db
        .conn
        .execute_unprepared(
            "INSERT INTO friendship (user_low, user_high, inviter_id, confirmed, created_at) \
             VALUES (5, 2, 5, false, '2025-01-01 00:00:00+00:00')",
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_transaction_rolls_back_on_drop() {
    let db = TestDatabase::in_memory().await.unwrap();
    let repo = FriendshipRepository::new(db.connection());

    let txn = repo.begin().await.unwrap();
    assert!(repo.insert_pending(&txn, 1, 2).await.unwrap());
    drop(txn);
    assert!(repo.find_by_pair(1, 2).await.unwrap().is_none());

    let txn = repo.begin().await.unwrap();
    assert!(repo.insert_pending(&txn, 1, 2).await.unwrap());
    commit(txn).await.unwrap();
    assert!(repo.find_by_pair(1, 2).await.unwrap().is_some());
}

// === Likes ===

#[tokio::test]
async fn test_film_like_counts_and_peers() {
    let db = TestDatabase::in_memory().await.unwrap();
    let repo = FilmLikeRepository::new(db.connection());
    let conn = db.conn.as_ref();

    for (user_id, film_id) in [(1, 10), (1, 11), (2, 10), (2, 12), (3, 13)] {
        assert!(repo.insert(conn, user_id, film_id).await.unwrap());
    }
    assert!(!repo.insert(conn, 1, 10).await.unwrap());

    assert_eq!(repo.likers_of(12).await.unwrap(), BTreeSet::from([2]));
    assert_eq!(repo.count_by_film(10).await.unwrap(), 2);
    assert_eq!(repo.likers_of(10).await.unwrap(), BTreeSet::from([1, 2]));
    assert_eq!(repo.liked_films_of(1).await.unwrap(), BTreeSet::from([10, 11]));

    let counts = repo.like_counts().await.unwrap();
    assert_eq!(counts.get(&10), Some(&2));
    assert_eq!(counts.get(&13), Some(&1));
    assert_eq!(counts.get(&14), None);

    let own = BTreeSet::from([10, 11]);
    let peers = repo.co_likers(1, &own).await.unwrap();
    assert_eq!(peers, BTreeSet::from([2]));
    assert_eq!(
        repo.films_liked_by_any(&peers, &own).await.unwrap(),
        BTreeSet::from([12])
    );

    assert!(repo.delete(conn, 1, 10).await.unwrap());
    assert!(!repo.delete(conn, 1, 10).await.unwrap());
    assert_eq!(repo.count_by_film(10).await.unwrap(), 1);
}

// === Review marks ===

#[tokio::test]
async fn test_review_mark_polarity_and_scores() {
    let db = TestDatabase::in_memory().await.unwrap();
    let repo = ReviewMarkRepository::new(db.connection());
    let conn = db.conn.as_ref();

    assert!(repo.insert(conn, 1, 100, true).await.unwrap());
    assert!(!repo.insert(conn, 1, 100, false).await.unwrap());
    assert!(repo.insert(conn, 2, 100, false).await.unwrap());
    assert!(repo.insert(conn, 3, 100, false).await.unwrap());
    assert!(repo.insert(conn, 1, 101, true).await.unwrap());

    let scores = repo.usefulness_of(&[100, 101, 102]).await.unwrap();
    assert_eq!(scores.get(&100), Some(&-1));
    assert_eq!(scores.get(&101), Some(&1));
    assert_eq!(scores.get(&102), None);

    assert!(!repo.set_polarity(conn, 1, 100, true).await.unwrap());
    assert!(repo.set_polarity(conn, 2, 100, true).await.unwrap());
    assert_eq!(repo.usefulness_of(&[100]).await.unwrap().get(&100), Some(&1));

    assert_eq!(repo.delete_by_review(conn, 100).await.unwrap(), 3);
    assert!(repo.usefulness_of(&[100]).await.unwrap().is_empty());
    assert!(repo.delete(conn, 1, 101).await.unwrap());

    assert!(!repo.is_deleted(100).await.unwrap());
    assert!(repo.insert_deleted(conn, 100, 9).await.unwrap());
    assert!(!repo.insert_deleted(conn, 100, 9).await.unwrap());
    assert!(repo.is_deleted(100).await.unwrap());
    assert!(!repo.is_deleted(101).await.unwrap());
}

// === Feed events ===

#[tokio::test]
async fn test_feed_event_ids_and_ordering() {
    let db = TestDatabase::in_memory().await.unwrap();
    let repo = FeedEventRepository::new(db.connection());
    let conn = db.conn.as_ref();
    let now = Utc::now();

    let first = repo
        .insert(
            conn,
            NewFeedEvent {
                actor_id: 1,
                entity_id: 10,
                occurred_on: now.into(),
                subject: EventSubject::Like,
                operation: EventOperation::Add,
            },
        )
        .await
        .unwrap();
    let second = repo
        .insert(
            conn,
            NewFeedEvent {
                actor_id: 2,
                entity_id: 1,
                occurred_on: (now - Duration::minutes(1)).into(),
                subject: EventSubject::Friend,
                operation: EventOperation::Add,
            },
        )
        .await
        .unwrap();
    let third = repo
        .insert(
            conn,
            NewFeedEvent::now(3, 100, EventSubject::Review, EventOperation::Update),
        )
        .await
        .unwrap();

    assert!(first.id < second.id && second.id < third.id);

    let stored = repo.find_by_id(second.id).await.unwrap().unwrap();
    assert_eq!(stored.subject, EventSubject::Friend);
    assert_eq!(stored.operation, EventOperation::Add);

    let events = repo
        .find_by_actors(&BTreeSet::from([1, 2]), None)
        .await
        .unwrap();
    assert_eq!(
        events.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );

    let limited = repo.find_by_actors(&BTreeSet::from([1, 2, 3]), Some(1)).await.unwrap();
    assert_eq!(limited[0].id, third.id);

    assert_eq!(repo.find_by_actor(3, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cleanup_empties_tables() {
    let db = TestDatabase::in_memory().await.unwrap();
    let likes = FilmLikeRepository::new(db.connection());
    likes.insert(db.conn.as_ref(), 1, 10).await.unwrap();

    db.cleanup().await.unwrap();

    assert!(likes.likers_of(10).await.unwrap().is_empty());
}

// === PostgreSQL ===

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_postgres_like_counts() {
    let db = TestDatabase::create_unique().await.expect("Failed to connect");
    let repo = FilmLikeRepository::new(db.connection());
    let conn = db.conn.as_ref();

    repo.insert(conn, 1, 10).await.unwrap();
    repo.insert(conn, 2, 10).await.unwrap();

    let counts = repo.like_counts().await.unwrap();
    assert_eq!(counts.get(&10), Some(&2));
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testdb"));
}
