//! API error types with HTTP response mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, ValidationError};
use serde::Serialize;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Resource not found.
    NotFound(String),
    /// Request conflicts with current state, e.g. a lesson is full.
    Conflict(String),
    /// The store failed; `context` names the operation, `detail` the cause.
    Internal { context: String, detail: String },
}

/// Body of every error response.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    /// Converts a domain error, using `context` as the message for store failures.
    pub fn from_domain(err: DomainError, context: &str) -> Self {
        match &err {
            DomainError::Validation(_) => ApiError::BadRequest(err.to_string()),
            DomainError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DomainError::CapacityExceeded { .. } => ApiError::Conflict(err.to_string()),
            DomainError::Store(store_err) => ApiError::Internal {
                context: context.to_string(),
                detail: store_err.to_string(),
            },
        }
    }

    /// Returns a mapper for `map_err` that tags store failures with `context`.
    pub fn context(context: &'static str) -> impl Fn(DomainError) -> ApiError {
        move |err| ApiError::from_domain(err, context)
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::Conflict(message) => ErrorBody {
                success: false,
                message,
                error: None,
            },
            ApiError::Internal { context, detail } => {
                tracing::error!(context = %context, error = %detail, "internal server error");
                metrics::counter!("store_errors_total").increment(1);
                ErrorBody {
                    success: false,
                    message: context,
                    error: Some(detail),
                }
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}
