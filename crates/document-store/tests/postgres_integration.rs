//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p document-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use document_store::{
    DocumentId, DocumentStore, DocumentStoreExt, Filter, IncrementOutcome, PostgresDocumentStore,
    Sort,
};
use serde_json::{Map, Value, json};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let store = PostgresDocumentStore::connect(&connection_string, None, 2)
                .await
                .unwrap();
            store.run_migrations().await.unwrap();
            store.pool().close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and a cleared table
async fn get_test_store() -> PostgresDocumentStore {
    let info = get_container_info().await;

    let store = PostgresDocumentStore::connect(&info.connection_string, None, 5)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE documents")
        .execute(store.pool())
        .await
        .unwrap();

    store
}

fn body(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[tokio::test]
async fn insert_and_find_by_id() {
    let store = get_test_store().await;

    let doc = store
        .insert("lessons", body(json!({"subject": "Art", "availableSpaces": 5})))
        .await
        .unwrap();

    let found = store.find_by_id("lessons", doc.id).await.unwrap().unwrap();
    assert_eq!(found, doc);
    assert!(store.find_by_id("orders", doc.id).await.unwrap().is_none());
}

#[tokio::test]
async fn find_all_keeps_insertion_order() {
    let store = get_test_store().await;
    let lessons = store.collection("lessons");

    let mut ids = Vec::new();
    for subject in ["Art", "Maths", "Music"] {
        ids.push(lessons.insert(body(json!({"subject": subject}))).await.unwrap().id);
    }

    let found: Vec<DocumentId> = lessons.find_all().await.unwrap().iter().map(|d| d.id).collect();
    assert_eq!(found, ids);
}

#[tokio::test]
async fn contains_any_matches_case_insensitively_and_literally() {
    let store = get_test_store().await;
    let lessons = store.collection("lessons");

    lessons
        .insert(body(json!({"subject": "Mobile App Development", "location": "Birmingham"})))
        .await
        .unwrap();
    lessons
        .insert(body(json!({"subject": "Cybersecurity Basics", "location": "Bristol"})))
        .await
        .unwrap();
    lessons
        .insert(body(json!({"subject": "100% Python", "location": "Leeds"})))
        .await
        .unwrap();

    let filter = Filter::contains_any(["subject", "location"], "BRI");
    let found = lessons.find(&filter, Sort::Insertion).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("location"), Some(&json!("Bristol")));

    let filter = Filter::contains_any(["subject", "location"], "%");
    let found = lessons.find(&filter, Sort::Insertion).await.unwrap();
    assert_eq!(found.len(), 1);

    let filter = Filter::contains_any(["subject", "location"], "zzz-not-there");
    assert!(lessons.find(&filter, Sort::Insertion).await.unwrap().is_empty());
}

#[tokio::test]
async fn newest_first_sorts_by_timestamp_field() {
    let store = get_test_store().await;
    let orders = store.collection("orders");

    let old = orders
        .insert(body(json!({"createdAt": "2024-01-01T10:00:00Z"})))
        .await
        .unwrap();
    let new = orders
        .insert(body(json!({"createdAt": "2024-01-01T10:00:00.250Z"})))
        .await
        .unwrap();
    let middle = orders
        .insert(body(json!({"createdAt": "2024-01-01T10:00:00.1Z"})))
        .await
        .unwrap();

    let found: Vec<DocumentId> = orders
        .find(&Filter::All, Sort::NewestFirst("createdAt"))
        .await
        .unwrap()
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(found, vec![new.id, middle.id, old.id]);
}

#[tokio::test]
async fn set_field_updates_and_reports_missing() {
    let store = get_test_store().await;
    let doc = store
        .insert("lessons", body(json!({"availableSpaces": 5})))
        .await
        .unwrap();

    let updated = store
        .set_field("lessons", doc.id, "availableSpaces", json!(0))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.get("availableSpaces"), Some(&json!(0)));

    let missing = store
        .set_field("lessons", DocumentId::new(), "availableSpaces", json!(1))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn increment_field_is_conditional() {
    let store = get_test_store().await;
    let doc = store
        .insert("lessons", body(json!({"availableSpaces": 3})))
        .await
        .unwrap();

    let applied = store
        .increment_field("lessons", doc.id, "availableSpaces", -3, 0)
        .await
        .unwrap();
    assert!(
        matches!(applied, IncrementOutcome::Applied(ref d) if d.get("availableSpaces") == Some(&json!(0)))
    );

    let rejected = store
        .increment_field("lessons", doc.id, "availableSpaces", -1, 0)
        .await
        .unwrap();
    assert_eq!(rejected, IncrementOutcome::Rejected { current: 0 });

    let missing = store
        .increment_field("lessons", DocumentId::new(), "availableSpaces", -1, 0)
        .await
        .unwrap();
    assert_eq!(missing, IncrementOutcome::NotFound);
}

#[tokio::test]
async fn concurrent_decrements_never_go_below_floor() {
    let store = get_test_store().await;
    let doc = store
        .insert("lessons", body(json!({"availableSpaces": 5})))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .increment_field("lessons", doc.id, "availableSpaces", -1, 0)
                .await
                .unwrap()
        }));
    }

    let mut applied = 0;
    for handle in handles {
        if let IncrementOutcome::Applied(_) = handle.await.unwrap() {
            applied += 1;
        }
    }
    assert_eq!(applied, 5);

    let found = store.find_by_id("lessons", doc.id).await.unwrap().unwrap();
    assert_eq!(found.get("availableSpaces"), Some(&json!(0)));
}

#[tokio::test]
async fn clear_only_touches_one_collection() {
    let store = get_test_store().await;
    store.insert("lessons", Map::new()).await.unwrap();
    store.insert("orders", Map::new()).await.unwrap();

    assert_eq!(store.clear("lessons").await.unwrap(), 1);
    assert!(store.collection("lessons").find_all().await.unwrap().is_empty());
    assert_eq!(store.collection("orders").find_all().await.unwrap().len(), 1);
}
