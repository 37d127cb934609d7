//! Vendor HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::vendor::VendorInput;
use crate::services::VendorService;
use crate::AppState;

/// List all vendors
pub async fn list_vendors(State(state): State<AppState>) -> impl IntoResponse {
    let service = VendorService::new(state.db.clone());

    match service.list().await {
        Ok(vendors) => {
            (StatusCode::OK, Json(serde_json::json!({ "vendors": vendors }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Create a vendor
pub async fn create_vendor(
    State(state): State<AppState>,
    Json(input): Json<VendorInput>,
) -> impl IntoResponse {
    let service = VendorService::new(state.db.clone());

    match service.create(input).await {
        Ok(vendor) => (StatusCode::CREATED, Json(vendor)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific vendor
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = VendorService::new(state.db.clone());

    match service.get(vendor_id).await {
        Ok(vendor) => (StatusCode::OK, Json(vendor)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a vendor
pub async fn update_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
    Json(input): Json<VendorInput>,
) -> impl IntoResponse {
    let service = VendorService::new(state.db.clone());

    match service.update(vendor_id, input).await {
        Ok(vendor) => (StatusCode::OK, Json(vendor)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a vendor
pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = VendorService::new(state.db.clone());

    match service.delete(vendor_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
