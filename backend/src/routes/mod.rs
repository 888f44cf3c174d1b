//! Route definitions for the inventory planner

use axum::{
    routing::{get, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/products", product_routes())
        .nest("/raw-materials", raw_material_routes())
        .nest("/product-materials", product_material_routes())
        .nest("/production", production_routes())
}

/// Product routes, including each product's bill of materials
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/:product_id/materials",
            get(handlers::list_product_materials).post(handlers::upsert_product_material),
        )
}

/// Raw material routes
fn raw_material_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_raw_materials).post(handlers::create_raw_material),
        )
        .route(
            "/:raw_material_id",
            get(handlers::get_raw_material)
                .put(handlers::update_raw_material)
                .delete(handlers::delete_raw_material),
        )
}

/// Bill-of-materials edge routes
fn product_material_routes() -> Router<AppState> {
    Router::new().route(
        "/:product_material_id",
        put(handlers::update_product_material).delete(handlers::delete_product_material),
    )
}

/// Production planning routes
fn production_routes() -> Router<AppState> {
    Router::new().route("/suggestions", get(handlers::get_production_suggestion))
}
