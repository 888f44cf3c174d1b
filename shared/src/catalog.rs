//! In-memory catalog
//!
//! Applies the catalog mutation rules (merge-on-create for raw materials,
//! upsert for bill-of-materials edges, cascading product deletion) to plain
//! vectors, and hands out snapshots for the planner. The PostgreSQL services
//! enforce the same rules with constraints and single-statement upserts.

use chrono::Utc;
use thiserror::Error;
use validator::Validate;

use crate::models::{
    material_name_key, Product, ProductInput, ProductMaterial, ProductMaterialInput, RawMaterial,
    RawMaterialCreated, RawMaterialInput,
};
use crate::planning::CatalogSnapshot;
use crate::validation::first_validation_failure;

/// Catalog mutation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("Raw material {0} is still used by a bill of materials")]
    InUse(i64),

    #[error("Stock for {0:?} would exceed the supported quantity")]
    StockOverflow(String),

    #[error("No ids left to allocate")]
    IdsExhausted,
}

impl From<validator::ValidationErrors> for CatalogError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (field, message) = first_validation_failure(&errors)
            .unwrap_or_else(|| ("input".to_string(), errors.to_string()));
        CatalogError::Invalid { field, message }
    }
}

/// Catalog held in memory, in insertion order
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    raw_materials: Vec<RawMaterial>,
    product_materials: Vec<ProductMaterial>,
    /// `None` once `i64::MAX` has been handed out
    next_id: Option<i64>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            raw_materials: Vec::new(),
            product_materials: Vec::new(),
            next_id: Some(1),
        }
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an existing snapshot; new records get ids above every id in it
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let max_id = snapshot
            .products
            .iter()
            .map(|p| p.id)
            .chain(snapshot.raw_materials.iter().map(|m| m.id))
            .chain(snapshot.product_materials.iter().map(|e| e.id))
            .max()
            .unwrap_or(0);

        Self {
            products: snapshot.products,
            raw_materials: snapshot.raw_materials,
            product_materials: snapshot.product_materials,
            next_id: max_id.checked_add(1),
        }
    }

    /// Copy of the current state for planning
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            products: self.products.clone(),
            raw_materials: self.raw_materials.clone(),
            product_materials: self.product_materials.clone(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn raw_materials(&self) -> &[RawMaterial] {
        &self.raw_materials
    }

    fn allocate_id(&mut self) -> Result<i64, CatalogError> {
        let id = self.next_id.ok_or(CatalogError::IdsExhausted)?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    pub fn create_product(&mut self, input: ProductInput) -> Result<Product, CatalogError> {
        let input = input.normalized();
        input.validate()?;

        let now = Utc::now();
        let product = Product {
            id: self.allocate_id()?,
            name: input.name,
            value: input.value,
            created_at: now,
            updated_at: now,
        };
        self.products.push(product.clone());
        Ok(product)
    }

    /// Remove a product and its bill of materials
    pub fn delete_product(&mut self, product_id: i64) -> Result<(), CatalogError> {
        let position = self
            .products
            .iter()
            .position(|p| p.id == product_id)
            .ok_or(CatalogError::NotFound("Product"))?;

        self.products.remove(position);
        self.product_materials.retain(|e| e.product_id != product_id);
        Ok(())
    }

    /// Create a raw material, or add the stock to the one with the same name.
    ///
    /// Names match case-insensitively; a merged record keeps its original name.
    pub fn create_raw_material(
        &mut self,
        input: RawMaterialInput,
    ) -> Result<RawMaterialCreated, CatalogError> {
        let input = input.normalized();
        input.validate()?;

        let key = input.name_key();
        let now = Utc::now();

        if let Some(existing) = self
            .raw_materials
            .iter_mut()
            .find(|m| material_name_key(&m.name) == key)
        {
            let stock_quantity = existing
                .stock_quantity
                .checked_add(input.stock_quantity)
                .ok_or_else(|| CatalogError::StockOverflow(existing.name.clone()))?;
            existing.stock_quantity = stock_quantity;
            existing.updated_at = now;

            return Ok(RawMaterialCreated {
                material: existing.clone(),
                merged: true,
            });
        }

        let material = RawMaterial {
            id: self.allocate_id()?,
            name: input.name,
            stock_quantity: input.stock_quantity,
            created_at: now,
            updated_at: now,
        };
        self.raw_materials.push(material.clone());

        Ok(RawMaterialCreated {
            material,
            merged: false,
        })
    }

    /// Remove a raw material that no product requires
    pub fn delete_raw_material(&mut self, raw_material_id: i64) -> Result<(), CatalogError> {
        let position = self
            .raw_materials
            .iter()
            .position(|m| m.id == raw_material_id)
            .ok_or(CatalogError::NotFound("Raw material"))?;

        if self
            .product_materials
            .iter()
            .any(|e| e.raw_material_id == raw_material_id)
        {
            return Err(CatalogError::InUse(raw_material_id));
        }

        self.raw_materials.remove(position);
        Ok(())
    }

    /// Add a bill-of-materials edge, or update the quantity of the existing one
    pub fn upsert_product_material(
        &mut self,
        product_id: i64,
        input: ProductMaterialInput,
    ) -> Result<ProductMaterial, CatalogError> {
        input.validate()?;

        if !self.products.iter().any(|p| p.id == product_id) {
            return Err(CatalogError::NotFound("Product"));
        }
        if !self
            .raw_materials
            .iter()
            .any(|m| m.id == input.raw_material_id)
        {
            return Err(CatalogError::NotFound("Raw material"));
        }

        let now = Utc::now();

        if let Some(existing) = self
            .product_materials
            .iter_mut()
            .find(|e| e.product_id == product_id && e.raw_material_id == input.raw_material_id)
        {
            existing.required_quantity = input.required_quantity;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let edge = ProductMaterial {
            id: self.allocate_id()?,
            product_id,
            raw_material_id: input.raw_material_id,
            required_quantity: input.required_quantity,
            created_at: now,
            updated_at: now,
        };
        self.product_materials.push(edge.clone());
        Ok(edge)
    }

    /// Bill of materials of one product, in insertion order
    pub fn bill_of_materials(&self, product_id: i64) -> Result<Vec<&ProductMaterial>, CatalogError> {
        if !self.products.iter().any(|p| p.id == product_id) {
            return Err(CatalogError::NotFound("Product"));
        }
        Ok(self
            .product_materials
            .iter()
            .filter(|e| e.product_id == product_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn raw(name: &str, stock: i32) -> RawMaterialInput {
        RawMaterialInput {
            name: name.to_string(),
            stock_quantity: stock,
        }
    }

    fn product(name: &str, value: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            value: value.parse::<Decimal>().unwrap(),
        }
    }

    #[test]
    fn test_create_raw_material_merges_case_insensitively() {
        let mut catalog = Catalog::new();

        let first = catalog.create_raw_material(raw("Bolt", 10)).unwrap();
        let second = catalog.create_raw_material(raw("  bOLT ", 5)).unwrap();

        assert!(!first.merged);
        assert!(second.merged);
        assert_eq!(second.material.id, first.material.id);
        assert_eq!(second.material.name, "Bolt");
        assert_eq!(catalog.raw_materials().len(), 1);
        assert_eq!(catalog.raw_materials()[0].stock_quantity, 15);
    }

    #[test]
    fn test_merge_overflow_leaves_stock_untouched() {
        let mut catalog = Catalog::new();
        catalog.create_raw_material(raw("Steel", i32::MAX)).unwrap();

        let result = catalog.create_raw_material(raw("steel", 1));

        assert_eq!(result.unwrap_err(), CatalogError::StockOverflow("Steel".to_string()));
        assert_eq!(catalog.raw_materials()[0].stock_quantity, i32::MAX);
    }

    #[test]
    fn test_invalid_raw_material_is_rejected() {
        let mut catalog = Catalog::new();
        let err = catalog.create_raw_material(raw("Steel", -4)).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { ref field, .. } if field == "stockQuantity"));
        assert!(catalog.raw_materials().is_empty());
    }

    #[test]
    fn test_upsert_product_material_updates_in_place() {
        let mut catalog = Catalog::new();
        let widget = catalog.create_product(product("Widget", "10.00")).unwrap();
        let steel = catalog.create_raw_material(raw("Steel", 10)).unwrap().material;

        let first = catalog
            .upsert_product_material(
                widget.id,
                ProductMaterialInput {
                    raw_material_id: steel.id,
                    required_quantity: 2,
                },
            )
            .unwrap();
        let second = catalog
            .upsert_product_material(
                widget.id,
                ProductMaterialInput {
                    raw_material_id: steel.id,
                    required_quantity: 3,
                },
            )
            .unwrap();

        assert_eq!(first.id, second.id);
        let bom = catalog.bill_of_materials(widget.id).unwrap();
        assert_eq!(bom.len(), 1);
        assert_eq!(bom[0].required_quantity, 3);
    }

    #[test]
    fn test_upsert_requires_existing_records() {
        let mut catalog = Catalog::new();
        let widget = catalog.create_product(product("Widget", "10.00")).unwrap();
        let input = ProductMaterialInput {
            raw_material_id: 999,
            required_quantity: 1,
        };

        assert_eq!(
            catalog.upsert_product_material(widget.id, input.clone()),
            Err(CatalogError::NotFound("Raw material"))
        );
        assert_eq!(
            catalog.upsert_product_material(999, input),
            Err(CatalogError::NotFound("Product"))
        );
    }

    #[test]
    fn test_delete_product_cascades_bill_of_materials() {
        let mut catalog = Catalog::new();
        let widget = catalog.create_product(product("Widget", "10.00")).unwrap();
        let steel = catalog.create_raw_material(raw("Steel", 10)).unwrap().material;
        catalog
            .upsert_product_material(
                widget.id,
                ProductMaterialInput {
                    raw_material_id: steel.id,
                    required_quantity: 2,
                },
            )
            .unwrap();

        assert_eq!(
            catalog.delete_raw_material(steel.id),
            Err(CatalogError::InUse(steel.id))
        );

        catalog.delete_product(widget.id).unwrap();
        assert!(catalog.snapshot().product_materials.is_empty());
        assert!(catalog.delete_raw_material(steel.id).is_ok());
    }

    #[test]
    fn test_from_snapshot_allocates_fresh_ids() {
        let mut seed = Catalog::new();
        seed.create_product(product("Widget", "10.00")).unwrap();
        seed.create_raw_material(raw("Steel", 10)).unwrap();

        let mut catalog = Catalog::from_snapshot(seed.snapshot());
        let bolt = catalog.create_raw_material(raw("Bolt", 1)).unwrap().material;

        assert_eq!(bolt.id, 3);
    }

    #[test]
    fn test_snapshot_holding_max_id_reports_exhaustion() {
        let mut seed = Catalog::new();
        seed.create_raw_material(raw("Steel", 10)).unwrap();
        let mut snapshot = seed.snapshot();
        snapshot.raw_materials[0].id = i64::MAX;

        let mut catalog = Catalog::from_snapshot(snapshot);

        // Merging needs no new id
        let merged = catalog.create_raw_material(raw("steel", 5)).unwrap();
        assert_eq!(merged.material.stock_quantity, 15);

        assert!(matches!(
            catalog.create_raw_material(raw("Bolt", 1)),
            Err(CatalogError::IdsExhausted)
        ));
        assert_eq!(
            catalog.create_product(product("Widget", "10.00")),
            Err(CatalogError::IdsExhausted)
        );
        assert_eq!(catalog.raw_materials().len(), 1);
    }
}
