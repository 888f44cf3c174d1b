//! Product service

use std::collections::HashMap;

use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{
    Product, ProductInput, ProductMaterialDetail, ProductMaterialDetailRow, ProductRow,
    ProductWithMaterials,
};

/// Product service for managing sellable products
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List products in creation order, each with its bill of materials
    pub async fn list(&self) -> AppResult<Vec<ProductWithMaterials>> {
        let products = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, value, created_at, updated_at
            FROM products
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        // One query for every edge rather than one per product
        let edges = sqlx::query_as::<_, ProductMaterialDetailRow>(
            r#"
            SELECT pm.id, pm.product_id, pm.raw_material_id, pm.required_quantity,
                   pm.created_at, pm.updated_at,
                   rm.name AS raw_material_name,
                   rm.stock_quantity AS raw_material_stock_quantity
            FROM product_materials pm
            JOIN raw_materials rm ON rm.id = pm.raw_material_id
            ORDER BY pm.created_at, pm.id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut by_product: HashMap<i64, Vec<ProductMaterialDetail>> = HashMap::new();
        for edge in edges {
            by_product
                .entry(edge.edge.product_id)
                .or_default()
                .push(edge.into());
        }

        Ok(products
            .into_iter()
            .map(|row| {
                let materials = by_product.remove(&row.id).unwrap_or_default();
                ProductWithMaterials {
                    product: row.into(),
                    materials,
                }
            })
            .collect())
    }

    /// Get a product by ID
    pub async fn get(&self, id: i64) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, value, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Create a product
    pub async fn create(&self, input: ProductInput) -> AppResult<Product> {
        let input = input.normalized();
        input.validate()?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, value)
            VALUES ($1, $2)
            RETURNING id, name, value, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.value)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(product_id = row.id, name = %row.name, value = %row.value, "Created product");
        Ok(row.into())
    }

    /// Replace the name and value of a product
    pub async fn update(&self, id: i64, input: ProductInput) -> AppResult<Product> {
        let input = input.normalized();
        input.validate()?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $1, value = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING id, name, value, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.value)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        tracing::info!(product_id = id, "Updated product");
        Ok(row.into())
    }

    /// Delete a product; its bill of materials goes with it (ON DELETE CASCADE)
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        tracing::info!(product_id = id, "Deleted product");
        Ok(())
    }
}
