pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::DocumentId;
pub use document::{Document, Filter, IncrementOutcome, Sort};
pub use error::{Result, StoreError};
pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use store::{Collection, DocumentStore, DocumentStoreExt};
