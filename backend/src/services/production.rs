//! Production suggestion service
//!
//! Loads a consistent catalog snapshot and hands it to the shared greedy
//! planner. Every call builds its own snapshot; nothing is cached between
//! requests.

use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::{
    Product, ProductMaterial, ProductMaterialRow, ProductRow, ProductionSuggestion, RawMaterial,
    RawMaterialRow,
};
use shared::planning::{plan_production, CatalogSnapshot};

/// Production service computing suggestions from current stock
#[derive(Clone)]
pub struct ProductionService {
    db: PgPool,
}

impl ProductionService {
    /// Create a new ProductionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Read products, raw materials and bill-of-materials edges as of one
    /// point in time.
    ///
    /// The three flat queries run in a single repeatable-read transaction so a
    /// concurrent stock change cannot land between them.
    pub async fn load_snapshot(&self) -> AppResult<CatalogSnapshot> {
        let mut tx = self.db.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let products = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, value, created_at, updated_at
            FROM products
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let raw_materials = sqlx::query_as::<_, RawMaterialRow>(
            r#"
            SELECT id, name, stock_quantity, created_at, updated_at
            FROM raw_materials
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let product_materials = sqlx::query_as::<_, ProductMaterialRow>(
            r#"
            SELECT id, product_id, raw_material_id, required_quantity, created_at, updated_at
            FROM product_materials
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CatalogSnapshot {
            products: products.into_iter().map(Product::from).collect(),
            raw_materials: raw_materials.into_iter().map(RawMaterial::from).collect(),
            product_materials: product_materials
                .into_iter()
                .map(ProductMaterial::from)
                .collect(),
        })
    }

    /// Compute the production suggestion for the current catalog
    pub async fn suggest(&self) -> AppResult<ProductionSuggestion> {
        let snapshot = self.load_snapshot().await?;
        let suggestion = plan_production(&snapshot);

        tracing::info!(
            products = snapshot.products.len(),
            raw_materials = snapshot.raw_materials.len(),
            items = suggestion.items.len(),
            grand_total_value = %suggestion.grand_total_value,
            "Computed production suggestion"
        );

        Ok(suggestion)
    }
}
