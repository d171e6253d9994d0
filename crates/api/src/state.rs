//! Shared application state.

use document_store::DocumentStore;
use domain::{LessonCatalog, OrderService};

/// Shared application state accessible from all handlers.
///
/// Services receive their own clone of the store handle; `store` is kept for
/// health checks.
pub struct AppState<S: DocumentStore> {
    pub lessons: LessonCatalog<S>,
    pub orders: OrderService<S>,
    pub store: S,
}

impl<S: DocumentStore + Clone> AppState<S> {
    /// Builds the services on top of one store handle.
    pub fn new(store: S) -> Self {
        Self {
            lessons: LessonCatalog::new(store.clone()),
            orders: OrderService::new(store.clone()),
            store,
        }
    }
}
