//! Orders: records, request validation and the order service.

mod model;
mod service;
mod validation;

pub use model::{NewOrder, Order, OrderStatus};
pub use service::OrderService;
pub use validation::OrderRequest;

/// Collection holding order documents.
pub const COLLECTION: &str = "orders";

/// Timestamp field orders are listed by.
pub const CREATED_AT: &str = "createdAt";
