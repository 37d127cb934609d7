//! Purchase lot HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::purchase::{CreatePurchaseInput, UpdatePurchaseInput};
use crate::services::PurchaseService;
use crate::AppState;

/// Purchase history, most recent first
pub async fn list_purchases(State(state): State<AppState>) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone(), state.ledger.clone());

    match service.list().await {
        Ok(purchases) => {
            (StatusCode::OK, Json(serde_json::json!({ "purchases": purchases }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Lots of one category in FIFO order
pub async fn list_purchases_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone(), state.ledger.clone());

    match service.list_by_category(category_id).await {
        Ok(purchases) => {
            (StatusCode::OK, Json(serde_json::json!({ "purchases": purchases }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Record a purchase
pub async fn create_purchase(
    State(state): State<AppState>,
    Json(input): Json<CreatePurchaseInput>,
) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone(), state.ledger.clone());

    match service.create(input).await {
        Ok(purchase) => (StatusCode::CREATED, Json(purchase)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific purchase lot
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone(), state.ledger.clone());

    match service.get(purchase_id).await {
        Ok(purchase) => (StatusCode::OK, Json(purchase)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Edit a purchase lot
pub async fn update_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
    Json(input): Json<UpdatePurchaseInput>,
) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone(), state.ledger.clone());

    match service.update(purchase_id, input).await {
        Ok(purchase) => (StatusCode::OK, Json(purchase)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete an untouched purchase lot
pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone(), state.ledger.clone());

    match service.delete(purchase_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
