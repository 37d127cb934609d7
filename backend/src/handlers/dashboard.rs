//! Dashboard HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::{InventoryService, ReportingService};
use crate::AppState;

/// The dashboard's headline numbers
pub async fn get_dashboard_stats(State(state): State<AppState>) -> impl IntoResponse {
    let inventory = InventoryService::new(state.db.clone(), state.config.stock.thresholds());
    let service = ReportingService::new(state.db.clone(), inventory);

    match service.dashboard().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => e.into_response(),
    }
}
