//! Database row types for the inventory planner
//!
//! Re-exports the API models from the shared crate and adds the sqlx row
//! structs that map onto them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub use shared::models::*;

#[derive(Debug, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub value: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            value: row.value,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawMaterialRow {
    pub id: i64,
    pub name: String,
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RawMaterialRow> for RawMaterial {
    fn from(row: RawMaterialRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            stock_quantity: row.stock_quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Row returned by the merge-on-create upsert
#[derive(Debug, sqlx::FromRow)]
pub struct RawMaterialUpsertRow {
    #[sqlx(flatten)]
    pub material: RawMaterialRow,
    /// `xmax = 0` on the returned tuple: the row was inserted, not updated
    pub inserted: bool,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProductMaterialRow {
    pub id: i64,
    pub product_id: i64,
    pub raw_material_id: i64,
    pub required_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductMaterialRow> for ProductMaterial {
    fn from(row: ProductMaterialRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            raw_material_id: row.raw_material_id,
            required_quantity: row.required_quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Bill-of-materials edge joined with its raw material
#[derive(Debug, sqlx::FromRow)]
pub struct ProductMaterialDetailRow {
    #[sqlx(flatten)]
    pub edge: ProductMaterialRow,
    pub raw_material_name: String,
    pub raw_material_stock_quantity: i32,
}

impl From<ProductMaterialDetailRow> for ProductMaterialDetail {
    fn from(row: ProductMaterialDetailRow) -> Self {
        let raw_material = RawMaterialRef {
            id: row.edge.raw_material_id,
            name: row.raw_material_name,
            stock_quantity: row.raw_material_stock_quantity,
        };
        Self {
            edge: row.edge.into(),
            raw_material,
        }
    }
}
