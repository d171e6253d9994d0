//! Domain error types.

use common::DocumentId;
use document_store::StoreError;
use thiserror::Error;

/// The kinds of record the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Lesson,
    Order,
}

impl Entity {
    /// Lowercase noun used inside sentences.
    pub fn noun(&self) -> &'static str {
        match self {
            Entity::Lesson => "lesson",
            Entity::Order => "order",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Lesson => write!(f, "Lesson"),
            Entity::Order => write!(f, "Order"),
        }
    }
}

/// Rejected input. Each variant renders the message shown to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: name, phone, lessonIDs, numberOfSpaces")]
    MissingOrderFields,

    #[error("Name must be at least 2 characters long")]
    NameTooShort,

    #[error("Invalid phone number format")]
    InvalidPhone,

    #[error("lessonIDs must be a non-empty array")]
    EmptyCart,

    #[error("numberOfSpaces must be a positive integer")]
    InvalidSpaceCount,

    #[error("Invalid {} ID format", .entity.noun())]
    InvalidId { entity: Entity },

    #[error("Search query parameter \"q\" is required")]
    MissingSearchTerm,

    #[error("Valid availableSpaces value is required")]
    InvalidCapacity,

    #[error("Lesson price must not be negative")]
    NegativePrice,
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The request was malformed or incomplete.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A well-formed id matched no record.
    #[error("{entity} not found")]
    NotFound { entity: Entity, id: DocumentId },

    /// A lesson does not have enough spaces left for a reservation.
    #[error(
        "Not enough spaces in lesson {lesson_id}: requested {requested}, available {available}"
    )]
    CapacityExceeded {
        lesson_id: DocumentId,
        requested: u32,
        available: i64,
    },

    /// An error occurred in the document store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    pub(crate) fn not_found(entity: Entity, id: DocumentId) -> Self {
        DomainError::NotFound { entity, id }
    }
}
