//! Bill-of-materials models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::RawMaterialRef;

/// One bill-of-materials edge: units of a raw material consumed per unit of a product.
///
/// There is at most one edge per (product, raw material) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMaterial {
    pub id: i64,
    pub product_id: i64,
    pub raw_material_id: i64,
    pub required_quantity: i32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Input for adding or changing a bill-of-materials edge
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductMaterialInput {
    pub raw_material_id: i64,
    #[validate(range(min = 1, message = "Required quantity must be at least 1"))]
    pub required_quantity: i32,
}

/// Bill-of-materials edge with the referenced raw material resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMaterialDetail {
    #[serde(flatten)]
    pub edge: ProductMaterial,
    pub raw_material: RawMaterialRef,
}
