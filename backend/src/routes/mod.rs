//! Route definitions for the meat shop inventory system

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Catalog
        .nest("/categories", category_routes())
        .nest("/vendors", vendor_routes())
        .nest("/customers", customer_routes())
        .nest("/products", product_routes())
        // Stock ledger
        .nest("/purchases", purchase_routes())
        .nest("/inventory", inventory_routes())
        // Point of sale
        .nest("/sales", sale_routes())
        // Daily tracking
        .nest("/waste-tracking", waste_routes())
        .nest("/pieces-tracking", pieces_routes())
        // Dashboard
        .route("/dashboard/stats", get(handlers::get_dashboard_stats))
}

/// Main category routes
fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_categories).post(handlers::create_category))
        .route(
            "/:category_id",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route("/:category_id/products", get(handlers::list_products_by_category))
        .route("/:category_id/purchases", get(handlers::list_purchases_by_category))
}

/// Vendor routes
fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_vendors).post(handlers::create_vendor))
        .route(
            "/:vendor_id",
            get(handlers::get_vendor)
                .put(handlers::update_vendor)
                .delete(handlers::delete_vendor),
        )
}

/// Customer routes
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_customers).post(handlers::create_customer))
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
}

/// Derived product routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
}

/// Purchase lot routes
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases).post(handlers::create_purchase))
        .route(
            "/:purchase_id",
            get(handlers::get_purchase)
                .put(handlers::update_purchase)
                .delete(handlers::delete_purchase),
        )
}

/// Inventory summary routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::get_inventory_summary))
        .route("/low-stock", get(handlers::get_low_stock))
        .route("/waste-summary", get(handlers::get_waste_summary))
}

/// POS sale routes
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route("/:sale_id", get(handlers::get_sale).delete(handlers::delete_sale))
}

/// Daily waste tracking routes
fn waste_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_waste).post(handlers::create_waste))
        .route(
            "/:record_id",
            get(handlers::get_waste)
                .put(handlers::update_waste)
                .delete(handlers::delete_waste),
        )
}

/// Daily pieces tracking routes
fn pieces_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_pieces).post(handlers::create_pieces))
        .route(
            "/:record_id",
            get(handlers::get_pieces)
                .put(handlers::update_pieces)
                .delete(handlers::delete_pieces),
        )
}
