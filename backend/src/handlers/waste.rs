//! Daily waste tracking HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::waste::{CreateWasteInput, UpdateWasteInput};
use crate::services::WasteService;
use crate::AppState;

/// Waste history, most recent day first
pub async fn list_waste(State(state): State<AppState>) -> impl IntoResponse {
    let service = WasteService::new(state.db.clone(), state.ledger.clone());

    match service.list().await {
        Ok(records) => {
            (StatusCode::OK, Json(serde_json::json!({ "records": records }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Record waste for a category
pub async fn create_waste(
    State(state): State<AppState>,
    Json(input): Json<CreateWasteInput>,
) -> impl IntoResponse {
    let service = WasteService::new(state.db.clone(), state.ledger.clone());

    match service.create(input).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific waste record
pub async fn get_waste(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = WasteService::new(state.db.clone(), state.ledger.clone());

    match service.get(record_id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Correct a waste record
pub async fn update_waste(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Json(input): Json<UpdateWasteInput>,
) -> impl IntoResponse {
    let service = WasteService::new(state.db.clone(), state.ledger.clone());

    match service.update(record_id, input).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a waste record, restoring its weight
pub async fn delete_waste(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = WasteService::new(state.db.clone(), state.ledger.clone());

    match service.delete(record_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
