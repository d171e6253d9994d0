use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{Document, DocumentId, Filter, IncrementOutcome, Result, Sort};

/// Core trait for document store implementations.
///
/// A document store keeps schemaless JSON documents grouped into named
/// collections. Every operation is scoped to one collection. All
/// implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Verifies the store is reachable.
    async fn ping(&self) -> Result<()>;

    /// Inserts a new document and returns it with its assigned id.
    async fn insert(&self, collection: &str, body: Map<String, Value>) -> Result<Document>;

    /// Retrieves all documents matching `filter`, ordered by `sort`.
    async fn find(&self, collection: &str, filter: &Filter, sort: Sort) -> Result<Vec<Document>>;

    /// Retrieves a single document by id.
    ///
    /// Returns None if no document has the id.
    async fn find_by_id(&self, collection: &str, id: DocumentId) -> Result<Option<Document>>;

    /// Overwrites one top-level field and returns the post-update document.
    ///
    /// Returns None if no document has the id.
    async fn set_field(
        &self,
        collection: &str,
        id: DocumentId,
        field: &str,
        value: Value,
    ) -> Result<Option<Document>>;

    /// Atomically adds `delta` to an integer field, but only if the result
    /// stays at or above `floor`.
    ///
    /// The check and the write happen as one operation, so concurrent callers
    /// can never push the field below the floor.
    async fn increment_field(
        &self,
        collection: &str,
        id: DocumentId,
        field: &str,
        delta: i64,
        floor: i64,
    ) -> Result<IncrementOutcome>;

    /// Removes every document in a collection, returning how many were removed.
    async fn clear(&self, collection: &str) -> Result<u64>;
}

/// Extension trait providing convenience methods for document stores.
pub trait DocumentStoreExt: DocumentStore {
    /// Returns a handle bound to the named collection.
    fn collection<'a>(&'a self, name: &'a str) -> Collection<'a, Self> {
        Collection { store: self, name }
    }
}

// Blanket implementation for all DocumentStore implementations
impl<T: DocumentStore + ?Sized> DocumentStoreExt for T {}

/// A store handle scoped to one collection.
pub struct Collection<'a, S: ?Sized> {
    store: &'a S,
    name: &'a str,
}

impl<S: ?Sized> Clone for Collection<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for Collection<'_, S> {}

impl<'a, S: DocumentStore + ?Sized> Collection<'a, S> {
    /// Returns the collection name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub async fn insert(&self, body: Map<String, Value>) -> Result<Document> {
        self.store.insert(self.name, body).await
    }

    pub async fn find(&self, filter: &Filter, sort: Sort) -> Result<Vec<Document>> {
        self.store.find(self.name, filter, sort).await
    }

    pub async fn find_all(&self) -> Result<Vec<Document>> {
        self.store.find(self.name, &Filter::All, Sort::Insertion).await
    }

    pub async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>> {
        self.store.find_by_id(self.name, id).await
    }

    pub async fn set_field(
        &self,
        id: DocumentId,
        field: &str,
        value: Value,
    ) -> Result<Option<Document>> {
        self.store.set_field(self.name, id, field, value).await
    }

    pub async fn increment_field(
        &self,
        id: DocumentId,
        field: &str,
        delta: i64,
        floor: i64,
    ) -> Result<IncrementOutcome> {
        self.store
            .increment_field(self.name, id, field, delta, floor)
            .await
    }

    pub async fn clear(&self) -> Result<u64> {
        self.store.clear(self.name).await
    }
}
