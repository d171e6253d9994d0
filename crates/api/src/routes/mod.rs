//! HTTP handlers grouped by resource.

pub mod health;
pub mod images;
pub mod index;
pub mod lessons;
pub mod metrics;
pub mod orders;

use axum::Json;
use axum::http::{StatusCode, Uri};
use serde_json::{Value, json};

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found",
            "requestedPath": uri.path(),
        })),
    )
}
