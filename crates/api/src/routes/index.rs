//! API description served at the root path.

use axum::Json;
use serde_json::{Value, json};

/// GET / — names the service and lists its endpoints.
pub async fn describe() -> Json<Value> {
    Json(json!({
        "message": "ClassCart API Server",
        "version": env!("CARGO_PKG_VERSION"),
        "database": "PostgreSQL document store",
        "endpoints": {
            "lessons": {
                "getAll": "GET /lessons",
                "search": "GET /lessons/search?q=query",
                "getOne": "GET /lessons/:id",
                "update": "PUT /lessons/:id"
            },
            "orders": {
                "create": "POST /orders",
                "checkout": "POST /orders/checkout",
                "getAll": "GET /orders",
                "getOne": "GET /orders/:id"
            },
            "images": "GET /images/:filename",
            "health": "GET /health",
            "metrics": "GET /metrics"
        }
    }))
}
