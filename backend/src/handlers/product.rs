//! Derived product HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::services::product::ProductInput;
use crate::services::ProductService;
use crate::AppState;

/// List all derived products
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.list().await {
        Ok(products) => {
            (StatusCode::OK, Json(serde_json::json!({ "products": products }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// List products under one category
pub async fn list_products_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.list_by_category(category_id).await {
        Ok(products) => {
            (StatusCode::OK, Json(serde_json::json!({ "products": products }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Create a derived product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.create(input).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.get(product_id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.update(product_id, input).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.delete(product_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
