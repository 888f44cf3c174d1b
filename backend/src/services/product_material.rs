//! Bill-of-materials service

use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{ProductMaterialDetail, ProductMaterialDetailRow, ProductMaterialInput};

/// Bill-of-materials service for product/raw material edges
#[derive(Clone)]
pub struct ProductMaterialService {
    db: PgPool,
}

impl ProductMaterialService {
    /// Create a new ProductMaterialService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn ensure_product(&self, product_id: i64) -> AppResult<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(())
    }

    async fn ensure_raw_material(&self, raw_material_id: i64) -> AppResult<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM raw_materials WHERE id = $1)")
                .bind(raw_material_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Raw material".to_string()));
        }
        Ok(())
    }

    /// Bill of materials of a product with each raw material's name and stock
    pub async fn list_by_product(&self, product_id: i64) -> AppResult<Vec<ProductMaterialDetail>> {
        self.ensure_product(product_id).await?;

        let rows = sqlx::query_as::<_, ProductMaterialDetailRow>(
            r#"
            SELECT pm.id, pm.product_id, pm.raw_material_id, pm.required_quantity,
                   pm.created_at, pm.updated_at,
                   rm.name AS raw_material_name,
                   rm.stock_quantity AS raw_material_stock_quantity
            FROM product_materials pm
            JOIN raw_materials rm ON rm.id = pm.raw_material_id
            WHERE pm.product_id = $1
            ORDER BY pm.created_at, pm.id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(ProductMaterialDetail::from).collect())
    }

    /// Add a raw material to a product's bill of materials, or change the
    /// quantity when the pair already exists
    pub async fn upsert(
        &self,
        product_id: i64,
        input: ProductMaterialInput,
    ) -> AppResult<ProductMaterialDetail> {
        input.validate()?;
        self.ensure_product(product_id).await?;
        self.ensure_raw_material(input.raw_material_id).await?;

        let row = sqlx::query_as::<_, ProductMaterialDetailRow>(
            r#"
            WITH upserted AS (
                INSERT INTO product_materials (product_id, raw_material_id, required_quantity)
                VALUES ($1, $2, $3)
                ON CONFLICT (product_id, raw_material_id) DO UPDATE
                SET required_quantity = EXCLUDED.required_quantity, updated_at = NOW()
                RETURNING id, product_id, raw_material_id, required_quantity, created_at, updated_at
            )
            SELECT u.id, u.product_id, u.raw_material_id, u.required_quantity,
                   u.created_at, u.updated_at,
                   rm.name AS raw_material_name,
                   rm.stock_quantity AS raw_material_stock_quantity
            FROM upserted u
            JOIN raw_materials rm ON rm.id = u.raw_material_id
            "#,
        )
        .bind(product_id)
        .bind(input.raw_material_id)
        .bind(input.required_quantity)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            product_id,
            raw_material_id = input.raw_material_id,
            required_quantity = input.required_quantity,
            "Upserted bill-of-materials edge"
        );
        Ok(row.into())
    }

    /// Change the raw material or quantity of an existing edge
    pub async fn update(
        &self,
        id: i64,
        input: ProductMaterialInput,
    ) -> AppResult<ProductMaterialDetail> {
        input.validate()?;
        self.ensure_raw_material(input.raw_material_id).await?;

        // Retargeting onto a material already in the product's BOM trips the unique constraint
        let row = sqlx::query_as::<_, ProductMaterialDetailRow>(
            r#"
            WITH updated AS (
                UPDATE product_materials
                SET raw_material_id = $1, required_quantity = $2, updated_at = NOW()
                WHERE id = $3
                RETURNING id, product_id, raw_material_id, required_quantity, created_at, updated_at
            )
            SELECT u.id, u.product_id, u.raw_material_id, u.required_quantity,
                   u.created_at, u.updated_at,
                   rm.name AS raw_material_name,
                   rm.stock_quantity AS raw_material_stock_quantity
            FROM updated u
            JOIN raw_materials rm ON rm.id = u.raw_material_id
            "#,
        )
        .bind(input.raw_material_id)
        .bind(input.required_quantity)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product material".to_string()))?;

        tracing::info!(product_material_id = id, "Updated bill-of-materials edge");
        Ok(row.into())
    }

    /// Remove an edge from a bill of materials
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM product_materials WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product material".to_string()));
        }

        tracing::info!(product_material_id = id, "Deleted bill-of-materials edge");
        Ok(())
    }
}
