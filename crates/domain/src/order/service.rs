//! Order service providing create, read and checkout operations.

use chrono::Utc;
use common::DocumentId;
use document_store::document::to_body;
use document_store::{Collection, Document, DocumentStore, DocumentStoreExt, Filter, Sort};

use super::{COLLECTION, CREATED_AT, NewOrder, Order, OrderRequest};
use crate::error::{DomainError, Entity, ValidationError};
use crate::lesson::LessonCatalog;

/// Service for managing orders.
///
/// `create` only records the order; keeping lesson capacity in step is left
/// to the caller. `checkout` reserves capacity and records the order as one
/// workflow, undoing reservations if any step fails.
pub struct OrderService<S: DocumentStore> {
    store: S,
    lessons: LessonCatalog<S>,
}

impl<S: DocumentStore + Clone> OrderService<S> {
    /// Creates a new order service with the given store.
    pub fn new(store: S) -> Self {
        let lessons = LessonCatalog::new(store.clone());
        Self { store, lessons }
    }
}

impl<S: DocumentStore> OrderService<S> {
    fn orders(&self) -> Collection<'_, S> {
        self.store.collection(COLLECTION)
    }

    fn decode(document: &Document) -> Result<Order, DomainError> {
        Ok(document.decode(COLLECTION)?)
    }

    /// Validates a payload and records it as a confirmed order.
    ///
    /// Referenced lessons are neither checked for existence nor for
    /// remaining capacity.
    #[tracing::instrument(skip(self, request))]
    pub async fn create(&self, request: &OrderRequest) -> Result<Order, DomainError> {
        let new_order = request.validate()?;
        let order = self.insert(&new_order).await?;

        metrics::counter!("orders_created_total", "workflow" => "direct").increment(1);
        tracing::info!(order_id = %order.id, lessons = order.lesson_ids.len(), "order created");
        Ok(order)
    }

    /// Reserves `numberOfSpaces` in every referenced lesson, then records the
    /// order.
    ///
    /// Each reservation is a conditional decrement, so capacity never goes
    /// negative. If a lesson is missing or full, or the order cannot be
    /// stored, spaces already taken are handed back before the error is
    /// returned.
    #[tracing::instrument(skip(self, request))]
    pub async fn checkout(&self, request: &OrderRequest) -> Result<Order, DomainError> {
        let new_order = request.validate()?;
        let spaces = new_order.number_of_spaces;

        let mut reserved: Vec<DocumentId> = Vec::with_capacity(new_order.lesson_ids.len());
        for &lesson_id in &new_order.lesson_ids {
            if reserved.contains(&lesson_id) {
                continue;
            }
            if let Err(e) = self.lessons.reserve(lesson_id, spaces).await {
                let reason = match &e {
                    DomainError::CapacityExceeded { .. } => "capacity",
                    DomainError::NotFound { .. } => "missing_lesson",
                    _ => "store",
                };
                metrics::counter!("checkout_rejected_total", "reason" => reason).increment(1);
                tracing::warn!(lesson_id = %lesson_id, error = %e, "reservation failed");
                self.release_all(&reserved, spaces).await;
                return Err(e);
            }
            reserved.push(lesson_id);
        }

        match self.insert(&new_order).await {
            Ok(order) => {
                metrics::counter!("orders_created_total", "workflow" => "checkout").increment(1);
                tracing::info!(order_id = %order.id, lessons = reserved.len(), "checkout completed");
                Ok(order)
            }
            Err(e) => {
                metrics::counter!("checkout_rejected_total", "reason" => "store").increment(1);
                self.release_all(&reserved, spaces).await;
                Err(e)
            }
        }
    }

    /// Hands reserved spaces back, newest reservation first.
    ///
    /// Failures are logged and skipped so the remaining lessons are still
    /// released.
    async fn release_all(&self, reserved: &[DocumentId], spaces: u32) {
        for &lesson_id in reserved.iter().rev() {
            if let Err(e) = self.lessons.release(lesson_id, spaces).await {
                tracing::error!(lesson_id = %lesson_id, error = %e, "failed to release reserved spaces");
            }
        }
    }

    async fn insert(&self, new_order: &NewOrder) -> Result<Order, DomainError> {
        let body = to_body(&new_order.fields(Utc::now()))?;
        let document = self.orders().insert(body).await?;
        Self::decode(&document)
    }

    /// Returns every order, most recent first.
    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Order>, DomainError> {
        self.orders()
            .find(&Filter::All, Sort::NewestFirst(CREATED_AT))
            .await?
            .iter()
            .map(Self::decode)
            .collect()
    }

    /// Loads an order by its reference token.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Order, DomainError> {
        let id = DocumentId::parse(id).map_err(|_| ValidationError::InvalidId {
            entity: Entity::Order,
        })?;

        let document = self
            .orders()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found(Entity::Order, id))?;
        Self::decode(&document)
    }

    /// Returns the lesson catalog this service reserves against.
    pub fn lessons(&self) -> &LessonCatalog<S> {
        &self.lessons
    }
}
