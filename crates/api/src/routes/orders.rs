//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use document_store::DocumentStore;
use domain::{Order, OrderRequest};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

type Created = (StatusCode, Json<ApiResponse<Order>>);

/// POST /orders — record an order without touching lesson capacity.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Created, ApiError> {
    let Json(req) = payload?;
    let order = state
        .orders
        .create(&req)
        .await
        .map_err(ApiError::context("Error creating order"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(order).with_message("Order created successfully")),
    ))
}

/// POST /orders/checkout — reserve spaces in every lesson, then record the order.
#[tracing::instrument(skip(state, payload))]
pub async fn checkout<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Created, ApiError> {
    let Json(req) = payload?;
    let order = state
        .orders
        .checkout(&req)
        .await
        .map_err(ApiError::context("Error placing order"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(order).with_message("Order placed successfully")),
    ))
}

/// GET /orders — list orders, newest first.
#[tracing::instrument(skip(state))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ApiResponse<Vec<Order>>>, ApiError> {
    let orders = state
        .orders
        .list_all()
        .await
        .map_err(ApiError::context("Error fetching orders"))?;

    Ok(Json(ApiResponse::list(orders)))
}

/// GET /orders/:id — fetch one order.
#[tracing::instrument(skip(state))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Order>>, ApiError> {
    let order = state
        .orders
        .get_by_id(&id)
        .await
        .map_err(ApiError::context("Error fetching order"))?;

    Ok(Json(ApiResponse::ok(order)))
}
