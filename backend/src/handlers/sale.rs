//! POS sale HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::sale::CreateSaleInput;
use crate::services::SaleService;
use crate::AppState;

/// All sales, most recent first
pub async fn list_sales(State(state): State<AppState>) -> impl IntoResponse {
    let service = SaleService::new(state.db.clone(), state.ledger.clone());

    match service.list().await {
        Ok(sales) => (StatusCode::OK, Json(serde_json::json!({ "sales": sales }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Record a sale
pub async fn create_sale(
    State(state): State<AppState>,
    Json(input): Json<CreateSaleInput>,
) -> impl IntoResponse {
    let service = SaleService::new(state.db.clone(), state.ledger.clone());

    match service.create(input).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific sale
pub async fn get_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = SaleService::new(state.db.clone(), state.ledger.clone());

    match service.get(sale_id).await {
        Ok(sale) => (StatusCode::OK, Json(sale)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a sale, restoring its stock
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = SaleService::new(state.db.clone(), state.ledger.clone());

    match service.delete(sale_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
