//! Lesson catalog: records and the service operating on them.

mod model;
mod service;

pub use model::{Lesson, NewLesson};
pub use service::LessonCatalog;

/// Collection holding lesson documents.
pub const COLLECTION: &str = "lessons";

/// Field storing a lesson's remaining capacity.
pub const AVAILABLE_SPACES: &str = "availableSpaces";
