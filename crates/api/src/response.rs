//! Success envelope shared by every JSON endpoint.

use serde::Serialize;

/// `{ "success": true, "data": ... }`, with optional extras.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wraps a single value.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            query: None,
            count: None,
            data,
        }
    }

    /// Attaches a human-readable message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Echoes the search term back to the client.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Wraps a list and records its length in `count`.
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            count: Some(count),
            ..Self::ok(data)
        }
    }
}
