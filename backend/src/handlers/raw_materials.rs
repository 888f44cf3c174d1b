//! HTTP handlers for raw material endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::models::{RawMaterial, RawMaterialCreated, RawMaterialInput};
use crate::services::RawMaterialService;
use crate::AppState;

/// List raw materials
pub async fn list_raw_materials(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RawMaterial>>> {
    let service = RawMaterialService::new(state.db);
    let materials = service.list().await?;
    Ok(Json(materials))
}

/// Get raw material by ID
pub async fn get_raw_material(
    State(state): State<AppState>,
    Path(raw_material_id): Path<i64>,
) -> AppResult<Json<RawMaterial>> {
    let service = RawMaterialService::new(state.db);
    let material = service.get(raw_material_id).await?;
    Ok(Json(material))
}

/// Create a raw material, merging into an existing one of the same name.
///
/// Responds 201 for a new record and 200 when stock was merged.
pub async fn create_raw_material(
    State(state): State<AppState>,
    Json(input): Json<RawMaterialInput>,
) -> AppResult<(StatusCode, Json<RawMaterialCreated>)> {
    let service = RawMaterialService::new(state.db);
    let created = service.create(input).await?;
    let status = if created.merged {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(created)))
}

/// Replace a raw material's name and stock
pub async fn update_raw_material(
    State(state): State<AppState>,
    Path(raw_material_id): Path<i64>,
    Json(input): Json<RawMaterialInput>,
) -> AppResult<Json<RawMaterial>> {
    let service = RawMaterialService::new(state.db);
    let material = service.update(raw_material_id, input).await?;
    Ok(Json(material))
}

/// Delete a raw material no product requires
pub async fn delete_raw_material(
    State(state): State<AppState>,
    Path(raw_material_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = RawMaterialService::new(state.db);
    service.delete(raw_material_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
