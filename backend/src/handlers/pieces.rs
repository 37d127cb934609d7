//! Daily pieces tracking HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::pieces::{CreatePiecesInput, UpdatePiecesInput};
use crate::services::PiecesService;
use crate::AppState;

/// Pieces history, most recent day first
pub async fn list_pieces(State(state): State<AppState>) -> impl IntoResponse {
    let service = PiecesService::new(state.db.clone(), state.ledger.clone());

    match service.list().await {
        Ok(records) => {
            (StatusCode::OK, Json(serde_json::json!({ "records": records }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Record pieces sold for a category on one day
pub async fn create_pieces(
    State(state): State<AppState>,
    Json(input): Json<CreatePiecesInput>,
) -> impl IntoResponse {
    let service = PiecesService::new(state.db.clone(), state.ledger.clone());

    match service.create(input).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific pieces record
pub async fn get_pieces(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PiecesService::new(state.db.clone(), state.ledger.clone());

    match service.get(record_id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Correct a day's pieces-sold figure
pub async fn update_pieces(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Json(input): Json<UpdatePiecesInput>,
) -> impl IntoResponse {
    let service = PiecesService::new(state.db.clone(), state.ledger.clone());

    match service.update(record_id, input).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a pieces record, restoring its pieces
pub async fn delete_pieces(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PiecesService::new(state.db.clone(), state.ledger.clone());

    match service.delete(record_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
