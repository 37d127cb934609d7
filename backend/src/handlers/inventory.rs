//! Inventory summary HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::InventoryService;
use crate::AppState;

/// Remaining stock per category with low-stock classification
pub async fn get_inventory_summary(State(state): State<AppState>) -> impl IntoResponse {
    let service = InventoryService::new(state.db.clone(), state.config.stock.thresholds());

    match service.summarize().await {
        Ok(summaries) => {
            (StatusCode::OK, Json(serde_json::json!({ "categories": summaries }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Only the categories under their warning threshold
pub async fn get_low_stock(State(state): State<AppState>) -> impl IntoResponse {
    let service = InventoryService::new(state.db.clone(), state.config.stock.thresholds());

    match service.low_stock().await {
        Ok(summaries) => {
            (StatusCode::OK, Json(serde_json::json!({ "categories": summaries }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Waste recorded today and over the trailing week, per category
pub async fn get_waste_summary(State(state): State<AppState>) -> impl IntoResponse {
    let service = InventoryService::new(state.db.clone(), state.config.stock.thresholds());

    match service.waste_summary().await {
        Ok(summaries) => {
            (StatusCode::OK, Json(serde_json::json!({ "categories": summaries }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}
