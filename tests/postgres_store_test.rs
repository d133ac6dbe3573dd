/// Postgres document store tests - database operations
///
/// Require TEST_DATABASE_URL; run with `cargo test -- --ignored`.
///
/// Tests cover:
/// - Insert-many duplicate skipping (stored and in-batch)
/// - Upsert replacement and idempotence
/// - Lookups, counts and disconnect
mod utils;

use catalog_sync_lib::modules::catalog::{
    domain::{Collection, StoredDocument},
    infrastructure::PostgresDocumentStore,
    DocumentStore,
};
use catalog_sync_lib::shared::errors::AppError;
use serde_json::json;
use utils::db;

fn doc(key: i64, name: &str) -> StoredDocument {
    StoredDocument {
        key,
        body: json!({"id": key, "name": name}),
    }
}

#[tokio::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn insert_many_skips_existing_and_repeated_keys() {
    let _guard = db::acquire_test_lock();
    db::clean_test_db();

    let store = PostgresDocumentStore::new(db::get_test_database());

    let first = store
        .insert_many(
            Collection::Genres,
            vec![doc(1, "Fantasy"), doc(1, "Fantasy twin"), doc(2, "Drama")],
        )
        .await
        .unwrap();
    assert_eq!(first.inserted, 2);
    assert_eq!(first.duplicate_keys, vec![1]);

    let second = store
        .insert_many(Collection::Genres, vec![doc(2, "Changed"), doc(3, "Poetry")])
        .await
        .unwrap();
    assert_eq!(second.inserted, 1);
    assert_eq!(second.duplicate_keys, vec![2]);

    assert_eq!(store.count(Collection::Genres).await.unwrap(), 3);
    let kept = store
        .find_by_key(Collection::Genres, 2)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept["name"], "Drama");
}

#[tokio::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn upsert_replaces_whole_document() {
    let _guard = db::acquire_test_lock();
    db::clean_test_db();

    let store = PostgresDocumentStore::new(db::get_test_database());

    store
        .upsert(
            Collection::Authors,
            StoredDocument {
                key: 7,
                body: json!({"id": 7, "book_count": 2, "books": [{"id": 1}, {"id": 2}]}),
            },
        )
        .await
        .unwrap();
    let replacement = StoredDocument {
        key: 7,
        body: json!({"id": 7, "book_count": 1, "books": [{"id": 3}]}),
    };
    store
        .upsert(Collection::Authors, replacement.clone())
        .await
        .unwrap();
    store
        .upsert(Collection::Authors, replacement.clone())
        .await
        .unwrap();

    assert_eq!(store.count(Collection::Authors).await.unwrap(), 1);
    assert_eq!(
        store.find_by_key(Collection::Authors, 7).await.unwrap(),
        Some(replacement.body)
    );
}

#[tokio::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn missing_key_and_empty_batch() {
    let _guard = db::acquire_test_lock();
    db::clean_test_db();

    let store = PostgresDocumentStore::new(db::get_test_database());

    assert_eq!(store.find_by_key(Collection::Tags, 404).await.unwrap(), None);
    let result = store.insert_many(Collection::Tags, vec![]).await.unwrap();
    assert_eq!(result.inserted, 0);
    assert_eq!(store.count(Collection::Books).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn disconnected_store_rejects_calls() {
    let _guard = db::acquire_test_lock();

    let store = PostgresDocumentStore::new(db::get_test_database());
    store.disconnect().await.unwrap();
    // a second disconnect is a no-op
    store.disconnect().await.unwrap();

    let err = store.count(Collection::Genres).await.unwrap_err();
    assert!(matches!(err, AppError::DatabaseError(_)));
}
