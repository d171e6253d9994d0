//! Lesson catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use document_store::DocumentStore;
use domain::Lesson;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLessonRequest {
    #[serde(default, rename = "availableSpaces")]
    pub available_spaces: Option<Value>,
}

// -- Handlers --

/// GET /lessons — list every lesson.
#[tracing::instrument(skip(state))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ApiResponse<Vec<Lesson>>>, ApiError> {
    let lessons = state
        .lessons
        .list_all()
        .await
        .map_err(ApiError::context("Error fetching lessons"))?;

    Ok(Json(ApiResponse::list(lessons)))
}

/// GET /lessons/search?q= — substring search over subject and location.
#[tracing::instrument(skip(state, params))]
pub async fn search<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Lesson>>>, ApiError> {
    let Query(params) = params?;
    tracing::debug!(q = ?params.q, "searching lessons");
    let lessons = state
        .lessons
        .search(params.q.as_deref())
        .await
        .map_err(ApiError::context("Error searching lessons"))?;

    let mut response = ApiResponse::list(lessons);
    if let Some(q) = params.q {
        response = response.with_query(q);
    }
    Ok(Json(response))
}

/// GET /lessons/:id — fetch one lesson.
#[tracing::instrument(skip(state))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Lesson>>, ApiError> {
    let lesson = state
        .lessons
        .get_by_id(&id)
        .await
        .map_err(ApiError::context("Error fetching lesson"))?;

    Ok(Json(ApiResponse::ok(lesson)))
}

/// PUT /lessons/:id — overwrite `availableSpaces`.
///
/// The client computes the new value; a missing, negative or non-integer
/// value is rejected.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLessonRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Lesson>>, ApiError> {
    let Json(req) = payload?;
    let new_value = req.available_spaces.as_ref().and_then(Value::as_i64);

    let lesson = state
        .lessons
        .update_capacity(&id, new_value)
        .await
        .map_err(ApiError::context("Error updating lesson"))?;

    Ok(Json(
        ApiResponse::ok(lesson).with_message("Lesson updated successfully"),
    ))
}
