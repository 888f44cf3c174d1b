//! Raw material service: stock records with merge-on-create

use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{RawMaterial, RawMaterialCreated, RawMaterialInput, RawMaterialRow, RawMaterialUpsertRow};

/// Raw material service for managing stock records
#[derive(Clone)]
pub struct RawMaterialService {
    db: PgPool,
}

impl RawMaterialService {
    /// Create a new RawMaterialService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List raw materials in creation order
    pub async fn list(&self) -> AppResult<Vec<RawMaterial>> {
        let rows = sqlx::query_as::<_, RawMaterialRow>(
            r#"
            SELECT id, name, stock_quantity, created_at, updated_at
            FROM raw_materials
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(RawMaterial::from).collect())
    }

    /// Get a raw material by ID
    pub async fn get(&self, id: i64) -> AppResult<RawMaterial> {
        let row = sqlx::query_as::<_, RawMaterialRow>(
            r#"
            SELECT id, name, stock_quantity, created_at, updated_at
            FROM raw_materials
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Raw material".to_string()))?;

        Ok(row.into())
    }

    /// Create a raw material, or add the stock to the existing one with the same name.
    ///
    /// A single upsert keyed on the case-insensitive name keeps concurrent
    /// creates of the same material from producing duplicates. The merged
    /// record keeps its original display name.
    pub async fn create(&self, input: RawMaterialInput) -> AppResult<RawMaterialCreated> {
        let input = input.normalized();
        input.validate()?;

        let row = sqlx::query_as::<_, RawMaterialUpsertRow>(
            r#"
            INSERT INTO raw_materials (name, name_key, stock_quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (name_key) DO UPDATE
            SET stock_quantity = raw_materials.stock_quantity + EXCLUDED.stock_quantity,
                updated_at = NOW()
            RETURNING id, name, stock_quantity, created_at, updated_at, (xmax = 0) AS inserted
            "#,
        )
        .bind(&input.name)
        .bind(input.name_key())
        .bind(input.stock_quantity)
        .fetch_one(&self.db)
        .await?;

        let merged = !row.inserted;
        let material = RawMaterial::from(row.material);

        if merged {
            tracing::info!(
                raw_material_id = material.id,
                added = input.stock_quantity,
                stock_quantity = material.stock_quantity,
                "Merged stock into existing raw material"
            );
        } else {
            tracing::info!(raw_material_id = material.id, name = %material.name, "Created raw material");
        }

        Ok(RawMaterialCreated { material, merged })
    }

    /// Replace the name and stock of a raw material
    pub async fn update(&self, id: i64, input: RawMaterialInput) -> AppResult<RawMaterial> {
        let input = input.normalized();
        input.validate()?;

        let row = sqlx::query_as::<_, RawMaterialRow>(
            r#"
            UPDATE raw_materials
            SET name = $1, name_key = $2, stock_quantity = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, name, stock_quantity, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.name_key())
        .bind(input.stock_quantity)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Raw material".to_string()))?;

        tracing::info!(raw_material_id = id, "Updated raw material");
        Ok(row.into())
    }

    /// Delete a raw material that no bill of materials references
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let in_use: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM product_materials WHERE raw_material_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if in_use {
            return Err(AppError::Conflict {
                resource: "rawMaterialId".to_string(),
                message: "Raw material is used by a product's bill of materials".to_string(),
            });
        }

        // The RESTRICT foreign key still guards against an edge added in between
        let result = sqlx::query("DELETE FROM raw_materials WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Raw material".to_string()));
        }

        tracing::info!(raw_material_id = id, "Deleted raw material");
        Ok(())
    }
}
