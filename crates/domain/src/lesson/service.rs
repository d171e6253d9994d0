//! Lesson catalog service.

use common::DocumentId;
use document_store::document::to_body;
use document_store::{
    Collection, Document, DocumentStore, DocumentStoreExt, Filter, IncrementOutcome, Sort,
};
use serde_json::Value;

use super::{AVAILABLE_SPACES, COLLECTION, Lesson, NewLesson};
use crate::error::{DomainError, Entity, ValidationError};

/// Fields matched by [`LessonCatalog::search`].
const SEARCH_FIELDS: [&str; 2] = ["subject", "location"];

/// Service for reading lessons and adjusting their capacity.
pub struct LessonCatalog<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> LessonCatalog<S> {
    /// Creates a new lesson catalog over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn lessons(&self) -> Collection<'_, S> {
        self.store.collection(COLLECTION)
    }

    fn decode(document: &Document) -> Result<Lesson, DomainError> {
        Ok(document.decode(COLLECTION)?)
    }

    /// Returns every lesson in store order.
    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Lesson>, DomainError> {
        self.lessons()
            .find_all()
            .await?
            .iter()
            .map(Self::decode)
            .collect()
    }

    /// Returns lessons whose subject or location contains `term`,
    /// ignoring case.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, term: Option<&str>) -> Result<Vec<Lesson>, DomainError> {
        let term = term
            .filter(|t| !t.is_empty())
            .ok_or(ValidationError::MissingSearchTerm)?;

        let filter = Filter::contains_any(SEARCH_FIELDS, term);
        let lessons = self
            .lessons()
            .find(&filter, Sort::Insertion)
            .await?
            .iter()
            .map(Self::decode)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = lessons.len(), "lesson search finished");
        Ok(lessons)
    }

    /// Loads a lesson by its reference token.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Lesson, DomainError> {
        let id = parse_lesson_id(id)?;
        self.find(id).await
    }

    /// Loads a lesson by a parsed id.
    pub async fn find(&self, id: DocumentId) -> Result<Lesson, DomainError> {
        let document = self
            .lessons()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found(Entity::Lesson, id))?;
        Self::decode(&document)
    }

    /// Overwrites a lesson's available spaces with exactly `new_value`.
    ///
    /// No check is made against existing orders; concurrent writers race
    /// and the last write wins.
    #[tracing::instrument(skip(self))]
    pub async fn update_capacity(
        &self,
        id: &str,
        new_value: Option<i64>,
    ) -> Result<Lesson, DomainError> {
        let id = parse_lesson_id(id)?;
        let new_value = new_value
            .and_then(|v| u32::try_from(v).ok())
            .ok_or(ValidationError::InvalidCapacity)?;

        let document = self
            .lessons()
            .set_field(id, AVAILABLE_SPACES, Value::from(new_value))
            .await?
            .ok_or(DomainError::not_found(Entity::Lesson, id))?;

        metrics::counter!("lesson_capacity_updates_total").increment(1);
        tracing::info!(lesson_id = %id, available_spaces = new_value, "lesson capacity set");
        Self::decode(&document)
    }

    /// Takes `spaces` from a lesson, failing if fewer remain.
    ///
    /// The check and decrement are a single store operation.
    #[tracing::instrument(skip(self))]
    pub async fn reserve(&self, id: DocumentId, spaces: u32) -> Result<Lesson, DomainError> {
        match self
            .lessons()
            .increment_field(id, AVAILABLE_SPACES, -i64::from(spaces), 0)
            .await?
        {
            IncrementOutcome::Applied(document) => Self::decode(&document),
            IncrementOutcome::Rejected { current } => Err(DomainError::CapacityExceeded {
                lesson_id: id,
                requested: spaces,
                available: current,
            }),
            IncrementOutcome::NotFound => Err(DomainError::not_found(Entity::Lesson, id)),
        }
    }

    /// Gives `spaces` back to a lesson.
    #[tracing::instrument(skip(self))]
    pub async fn release(&self, id: DocumentId, spaces: u32) -> Result<Lesson, DomainError> {
        match self
            .lessons()
            .increment_field(id, AVAILABLE_SPACES, i64::from(spaces), 0)
            .await?
        {
            IncrementOutcome::Applied(document) => Self::decode(&document),
            IncrementOutcome::Rejected { current } => Err(DomainError::CapacityExceeded {
                lesson_id: id,
                requested: spaces,
                available: current,
            }),
            IncrementOutcome::NotFound => Err(DomainError::not_found(Entity::Lesson, id)),
        }
    }

    /// Stores a new lesson.
    pub async fn insert(&self, lesson: &NewLesson) -> Result<Lesson, DomainError> {
        lesson.validate()?;
        let body = to_body(lesson)?;
        let document = self.lessons().insert(body).await?;
        Self::decode(&document)
    }

    /// Replaces the whole catalog with `lessons`.
    #[tracing::instrument(skip(self, lessons), fields(count = lessons.len()))]
    pub async fn replace_all(&self, lessons: &[NewLesson]) -> Result<Vec<Lesson>, DomainError> {
        // Check every draft up front so a bad entry cannot leave a half-empty catalog
        for lesson in lessons {
            lesson.validate()?;
        }

        let removed = self.lessons().clear().await?;
        tracing::info!(removed, "cleared existing lessons");

        let mut stored = Vec::with_capacity(lessons.len());
        for lesson in lessons {
            stored.push(self.insert(lesson).await?);
        }
        Ok(stored)
    }
}

fn parse_lesson_id(id: &str) -> Result<DocumentId, ValidationError> {
    DocumentId::parse(id).map_err(|_| ValidationError::InvalidId {
        entity: Entity::Lesson,
    })
}
