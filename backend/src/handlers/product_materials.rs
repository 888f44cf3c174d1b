//! HTTP handlers for bill-of-materials endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::models::{ProductMaterialDetail, ProductMaterialInput};
use crate::services::ProductMaterialService;
use crate::AppState;

/// List a product's bill of materials
pub async fn list_product_materials(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<Vec<ProductMaterialDetail>>> {
    let service = ProductMaterialService::new(state.db);
    let materials = service.list_by_product(product_id).await?;
    Ok(Json(materials))
}

/// Add a raw material to a product, or change its required quantity
pub async fn upsert_product_material(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(input): Json<ProductMaterialInput>,
) -> AppResult<(StatusCode, Json<ProductMaterialDetail>)> {
    let service = ProductMaterialService::new(state.db);
    let edge = service.upsert(product_id, input).await?;
    Ok((StatusCode::CREATED, Json(edge)))
}

/// Update a bill-of-materials edge
pub async fn update_product_material(
    State(state): State<AppState>,
    Path(product_material_id): Path<i64>,
    Json(input): Json<ProductMaterialInput>,
) -> AppResult<Json<ProductMaterialDetail>> {
    let service = ProductMaterialService::new(state.db);
    let edge = service.update(product_material_id, input).await?;
    Ok(Json(edge))
}

/// Delete a bill-of-materials edge
pub async fn delete_product_material(
    State(state): State<AppState>,
    Path(product_material_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = ProductMaterialService::new(state.db);
    service.delete(product_material_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
