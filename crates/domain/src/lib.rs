//! Domain layer for the lesson catalog.
//!
//! This crate provides:
//! - Lesson catalog service (list, search, fetch, capacity updates)
//! - Order service (create, list, fetch, checkout with capacity reservation)
//! - Pure request validation for incoming order payloads
//! - The seed catalog used to populate an empty store

pub mod error;
pub mod lesson;
pub mod order;
pub mod seed;

pub use common::DocumentId;
pub use error::{DomainError, Entity, ValidationError};
pub use lesson::{Lesson, LessonCatalog, NewLesson};
pub use order::{NewOrder, Order, OrderRequest, OrderService, OrderStatus};
