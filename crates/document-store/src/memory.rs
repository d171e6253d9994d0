use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::document::timestamp_of;
use crate::{
    Document, DocumentId, Filter, IncrementOutcome, Result, Sort, StoreError, store::DocumentStore,
};

/// In-memory document store implementation for testing.
///
/// This implementation keeps every collection in memory and provides
/// the same interface as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of documents in a collection.
    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn ping(&self) -> Result<()> {
        self.check_available()
    }

    async fn insert(&self, collection: &str, body: Map<String, Value>) -> Result<Document> {
        self.check_available()?;

        let document = Document::new(DocumentId::new(), body);
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn find(&self, collection: &str, filter: &Filter, sort: Sort) -> Result<Vec<Document>> {
        self.check_available()?;

        let store = self.collections.read().await;
        let mut documents: Vec<Document> = store
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.matches(&d.body))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Sort::NewestFirst(field) = sort {
            // Reverse first so the stable sort leaves later inserts ahead on ties
            documents.reverse();
            documents.sort_by(|a, b| timestamp_of(&b.body, field).cmp(&timestamp_of(&a.body, field)));
        }

        Ok(documents)
    }

    async fn find_by_id(&self, collection: &str, id: DocumentId) -> Result<Option<Document>> {
        self.check_available()?;

        let store = self.collections.read().await;
        Ok(store
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn set_field(
        &self,
        collection: &str,
        id: DocumentId,
        field: &str,
        value: Value,
    ) -> Result<Option<Document>> {
        self.check_available()?;

        let mut store = self.collections.write().await;
        let Some(document) = store
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
        else {
            return Ok(None);
        };

        document.body.insert(field.to_string(), value);
        Ok(Some(document.clone()))
    }

    async fn increment_field(
        &self,
        collection: &str,
        id: DocumentId,
        field: &str,
        delta: i64,
        floor: i64,
    ) -> Result<IncrementOutcome> {
        self.check_available()?;

        let mut store = self.collections.write().await;
        let Some(document) = store
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
        else {
            return Ok(IncrementOutcome::NotFound);
        };

        let current = document
            .body
            .get(field)
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let updated = current.saturating_add(delta);
        if updated < floor {
            return Ok(IncrementOutcome::Rejected { current });
        }

        document.body.insert(field.to_string(), Value::from(updated));
        Ok(IncrementOutcome::Applied(document.clone()))
    }

    async fn clear(&self, collection: &str) -> Result<u64> {
        self.check_available()?;

        let removed = self
            .collections
            .write()
            .await
            .remove(collection)
            .map_or(0, |docs| docs.len());
        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentStoreExt;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_keeps_order() {
        let store = InMemoryDocumentStore::new();
        let lessons = store.collection("lessons");

        let first = lessons.insert(body(json!({"subject": "Art"}))).await.unwrap();
        let second = lessons.insert(body(json!({"subject": "Maths"}))).await.unwrap();
        assert_ne!(first.id, second.id);

        let all = lessons.find_all().await.unwrap();
        assert_eq!(all, vec![first, second]);
        assert_eq!(store.document_count("lessons").await, 2);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = InMemoryDocumentStore::new();
        let doc = store.insert("lessons", body(json!({"a": 1}))).await.unwrap();

        assert!(store.find_by_id("orders", doc.id).await.unwrap().is_none());
        assert!(store.find_by_id("lessons", doc.id).await.unwrap().is_some());
        assert!(
            store
                .find("orders", &Filter::All, Sort::Insertion)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn newest_first_orders_by_timestamp_then_insertion() {
        let store = InMemoryDocumentStore::new();
        let orders = store.collection("orders");

        let old = orders
            .insert(body(json!({"createdAt": "2024-01-01T10:00:00Z"})))
            .await
            .unwrap();
        let newest = orders
            .insert(body(json!({"createdAt": "2024-03-01T10:00:00.5Z"})))
            .await
            .unwrap();
        let tie_a = orders
            .insert(body(json!({"createdAt": "2024-02-01T10:00:00Z"})))
            .await
            .unwrap();
        let tie_b = orders
            .insert(body(json!({"createdAt": "2024-02-01T10:00:00Z"})))
            .await
            .unwrap();

        let sorted = orders
            .find(&Filter::All, Sort::NewestFirst("createdAt"))
            .await
            .unwrap();
        let ids: Vec<_> = sorted.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![newest.id, tie_b.id, tie_a.id, old.id]);
    }

    #[tokio::test]
    async fn set_field_returns_updated_document() {
        let store = InMemoryDocumentStore::new();
        let doc = store
            .insert("lessons", body(json!({"availableSpaces": 5})))
            .await
            .unwrap();

        let updated = store
            .set_field("lessons", doc.id, "availableSpaces", json!(2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.get("availableSpaces"), Some(&json!(2)));

        let missing = store
            .set_field("lessons", DocumentId::new(), "availableSpaces", json!(2))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn increment_respects_floor() {
        let store = InMemoryDocumentStore::new();
        let doc = store
            .insert("lessons", body(json!({"availableSpaces": 3})))
            .await
            .unwrap();

        let applied = store
            .increment_field("lessons", doc.id, "availableSpaces", -2, 0)
            .await
            .unwrap();
        assert!(
            matches!(applied, IncrementOutcome::Applied(ref d) if d.get("availableSpaces") == Some(&json!(1)))
        );

        let rejected = store
            .increment_field("lessons", doc.id, "availableSpaces", -2, 0)
            .await
            .unwrap();
        assert_eq!(rejected, IncrementOutcome::Rejected { current: 1 });

        let missing = store
            .increment_field("lessons", DocumentId::new(), "availableSpaces", -1, 0)
            .await
            .unwrap();
        assert_eq!(missing, IncrementOutcome::NotFound);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_operation() {
        let store = InMemoryDocumentStore::new();
        store.set_unavailable(true);

        assert!(matches!(store.ping().await, Err(StoreError::Unavailable(_))));
        assert!(store.insert("lessons", Map::new()).await.is_err());
        assert!(store.collection("lessons").find_all().await.is_err());

        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn clear_removes_collection() {
        let store = InMemoryDocumentStore::new();
        store.insert("lessons", Map::new()).await.unwrap();
        store.insert("lessons", Map::new()).await.unwrap();
        store.insert("orders", Map::new()).await.unwrap();

        assert_eq!(store.clear("lessons").await.unwrap(), 2);
        assert_eq!(store.document_count("lessons").await, 0);
        assert_eq!(store.document_count("orders").await, 1);
    }
}
