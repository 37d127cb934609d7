//! Customer HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::customer::CustomerInput;
use crate::services::CustomerService;
use crate::AppState;

/// List all customers
pub async fn list_customers(State(state): State<AppState>) -> impl IntoResponse {
    let service = CustomerService::new(state.db.clone());

    match service.list().await {
        Ok(customers) => {
            (StatusCode::OK, Json(serde_json::json!({ "customers": customers }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CustomerInput>,
) -> impl IntoResponse {
    let service = CustomerService::new(state.db.clone());

    match service.create(input).await {
        Ok(customer) => (StatusCode::CREATED, Json(customer)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific customer
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = CustomerService::new(state.db.clone());

    match service.get(customer_id).await {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a customer
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<CustomerInput>,
) -> impl IntoResponse {
    let service = CustomerService::new(state.db.clone());

    match service.update(customer_id, input).await {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = CustomerService::new(state.db.clone());

    match service.delete(customer_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
