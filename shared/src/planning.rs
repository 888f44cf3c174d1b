//! Greedy production planning
//!
//! Turns a catalog snapshot into a ranked, stock-feasible production plan.
//! Products are visited from the highest unit value down; each one takes as
//! many units as the remaining stock allows, and that stock is committed before
//! the next product is considered. The pass never backtracks.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;
use crate::models::{Product, ProductMaterial, ProductionSuggestion, RawMaterial, SuggestionItem};
use crate::validation::validate_product_value;

/// Read-only catalog state a plan is computed from.
///
/// The order of `products` is significant: products of equal value are planned
/// in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub raw_materials: Vec<RawMaterial>,
    #[serde(default)]
    pub product_materials: Vec<ProductMaterial>,
}

impl CatalogSnapshot {
    /// Check product values against the stored bounds.
    ///
    /// Snapshots read from the database always pass. Snapshots supplied from
    /// outside must be checked before planning, since totals are computed with
    /// unchecked decimal arithmetic.
    pub fn validate_values(&self) -> Result<(), CatalogError> {
        for product in &self.products {
            validate_product_value(&product.value).map_err(|error| CatalogError::Invalid {
                field: "value".to_string(),
                message: format!(
                    "Product {}: {}",
                    product.id,
                    error.message.as_deref().unwrap_or("invalid value")
                ),
            })?;
        }
        Ok(())
    }
}

/// Units of one raw material consumed per unit of product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialRequirement {
    pub raw_material_id: i64,
    pub required_quantity: i64,
}

impl MaterialRequirement {
    /// Edges with a non-positive quantity are ignored rather than divided by
    fn is_usable(&self) -> bool {
        self.required_quantity > 0
    }
}

/// Bill-of-materials edges indexed by owning product
#[derive(Debug, Clone, Default)]
pub struct BillOfMaterialsIndex {
    by_product: HashMap<i64, Vec<MaterialRequirement>>,
}

impl BillOfMaterialsIndex {
    pub fn build(edges: &[ProductMaterial]) -> Self {
        let mut by_product: HashMap<i64, Vec<MaterialRequirement>> = HashMap::new();

        for edge in edges {
            let requirement = MaterialRequirement {
                raw_material_id: edge.raw_material_id,
                required_quantity: i64::from(edge.required_quantity),
            };
            let requirements = by_product.entry(edge.product_id).or_default();

            // A repeated (product, material) pair replaces the earlier edge, as an upsert would
            match requirements
                .iter_mut()
                .find(|existing| existing.raw_material_id == edge.raw_material_id)
            {
                Some(existing) => *existing = requirement,
                None => requirements.push(requirement),
            }
        }

        Self { by_product }
    }

    /// Requirements for a product; empty when it has no bill of materials
    pub fn requirements(&self, product_id: i64) -> &[MaterialRequirement] {
        self.by_product
            .get(&product_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Private scratch copy of stock levels for one planning pass
#[derive(Debug, Clone, Default)]
pub struct StockIndex {
    available: HashMap<i64, i64>,
}

impl StockIndex {
    pub fn from_materials(materials: &[RawMaterial]) -> Self {
        let available = materials
            .iter()
            .map(|material| (material.id, i64::from(material.stock_quantity)))
            .collect();
        Self { available }
    }

    /// Remaining stock; materials missing from the snapshot count as zero
    pub fn available(&self, raw_material_id: i64) -> i64 {
        self.available.get(&raw_material_id).copied().unwrap_or(0)
    }

    /// Whole units the scarcest requirement allows.
    ///
    /// Returns `None` when there is no usable requirement at all.
    pub fn producible(&self, requirements: &[MaterialRequirement]) -> Option<i64> {
        requirements
            .iter()
            .filter(|requirement| requirement.is_usable())
            .map(|requirement| {
                self.available(requirement.raw_material_id)
                    .div_euclid(requirement.required_quantity)
            })
            .min()
    }

    /// Deduct the stock consumed by `quantity` units
    pub fn consume(&mut self, requirements: &[MaterialRequirement], quantity: i64) {
        for requirement in requirements.iter().filter(|r| r.is_usable()) {
            *self
                .available
                .entry(requirement.raw_material_id)
                .or_insert(0) -= requirement.required_quantity * quantity;
        }
    }
}

/// Compute the greedy production plan for a snapshot.
///
/// Never fails: an empty catalog, products without a bill of materials and
/// materials absent from stock all simply yield fewer (or no) items.
pub fn plan_production(snapshot: &CatalogSnapshot) -> ProductionSuggestion {
    let bill_of_materials = BillOfMaterialsIndex::build(&snapshot.product_materials);
    let mut stock = StockIndex::from_materials(&snapshot.raw_materials);

    let mut ranked: Vec<&Product> = snapshot.products.iter().collect();
    // sort_by is stable: equal values keep snapshot order
    ranked.sort_by(|a, b| b.value.cmp(&a.value));

    let mut items = Vec::new();
    let mut grand_total_value = Decimal::ZERO;

    for product in ranked {
        let requirements = bill_of_materials.requirements(product.id);
        let quantity = match stock.producible(requirements) {
            Some(quantity) if quantity > 0 => quantity,
            _ => continue,
        };

        stock.consume(requirements, quantity);

        let total_value = product.value * Decimal::from(quantity);
        grand_total_value += total_value;

        items.push(SuggestionItem {
            product_id: product.id,
            product_name: product.name.clone(),
            product_value: product.value,
            producible_quantity: quantity,
            total_value,
        });
    }

    ProductionSuggestion {
        items,
        grand_total_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn material(id: i64, name: &str, stock: i32) -> RawMaterial {
        RawMaterial {
            id,
            name: name.to_string(),
            stock_quantity: stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn product(id: i64, name: &str, value: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            value: dec(value),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn edge(id: i64, product_id: i64, raw_material_id: i64, required: i32) -> ProductMaterial {
        ProductMaterial {
            id,
            product_id,
            raw_material_id,
            required_quantity: required,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_bom_index_missing_product_is_empty() {
        let index = BillOfMaterialsIndex::build(&[edge(1, 1, 10, 2)]);
        assert_eq!(index.requirements(1).len(), 1);
        assert!(index.requirements(2).is_empty());
    }

    #[test]
    fn test_bom_index_repeated_pair_keeps_last_quantity() {
        let index = BillOfMaterialsIndex::build(&[edge(1, 1, 10, 2), edge(2, 1, 10, 7)]);
        assert_eq!(
            index.requirements(1),
            &[MaterialRequirement {
                raw_material_id: 10,
                required_quantity: 7
            }]
        );
    }

    #[test]
    fn test_stock_index_producible_uses_scarcest_material() {
        let stock = StockIndex::from_materials(&[material(1, "Steel", 10), material(2, "Bolt", 9)]);
        let requirements = [
            MaterialRequirement {
                raw_material_id: 1,
                required_quantity: 2,
            },
            MaterialRequirement {
                raw_material_id: 2,
                required_quantity: 4,
            },
        ];
        assert_eq!(stock.producible(&requirements), Some(2));
    }

    #[test]
    fn test_stock_index_ignores_non_positive_requirements() {
        let stock = StockIndex::from_materials(&[material(1, "Steel", 10)]);
        let malformed = [MaterialRequirement {
            raw_material_id: 1,
            required_quantity: 0,
        }];
        assert_eq!(stock.producible(&malformed), None);

        let mixed = [
            MaterialRequirement {
                raw_material_id: 1,
                required_quantity: -3,
            },
            MaterialRequirement {
                raw_material_id: 1,
                required_quantity: 5,
            },
        ];
        assert_eq!(stock.producible(&mixed), Some(2));
    }

    #[test]
    fn test_stock_index_consume() {
        let mut stock = StockIndex::from_materials(&[material(1, "Steel", 10)]);
        let requirements = [MaterialRequirement {
            raw_material_id: 1,
            required_quantity: 3,
        }];
        stock.consume(&requirements, 3);
        assert_eq!(stock.available(1), 1);
        assert_eq!(stock.available(99), 0);
    }

    #[test]
    fn test_premium_consumes_shared_stock_first() {
        let snapshot = CatalogSnapshot {
            products: vec![product(2, "Basic", "40.00"), product(1, "Premium", "100.00")],
            raw_materials: vec![material(1, "Steel", 10)],
            product_materials: vec![edge(1, 1, 1, 5), edge(2, 2, 1, 2)],
        };

        let plan = plan_production(&snapshot);

        assert_eq!(plan.items.len(), 1);
        assert_eq!(plan.items[0].product_name, "Premium");
        assert_eq!(plan.items[0].producible_quantity, 2);
        assert_eq!(plan.items[0].total_value, dec("200.00"));
        assert_eq!(plan.grand_total_value, dec("200.00"));
    }

    #[test]
    fn test_lower_value_product_uses_leftovers() {
        let snapshot = CatalogSnapshot {
            products: vec![product(1, "Premium", "100.00"), product(2, "Basic", "40.00")],
            raw_materials: vec![material(1, "Steel", 13)],
            product_materials: vec![edge(1, 1, 1, 5), edge(2, 2, 1, 2)],
        };

        let plan = plan_production(&snapshot);

        assert_eq!(plan.items.len(), 2);
        assert_eq!(plan.items[1].product_name, "Basic");
        assert_eq!(plan.items[1].producible_quantity, 1);
        assert_eq!(plan.grand_total_value, dec("240.00"));
    }

    #[test]
    fn test_snapshot_is_not_mutated() {
        let snapshot = CatalogSnapshot {
            products: vec![product(1, "Premium", "100.00")],
            raw_materials: vec![material(1, "Steel", 10)],
            product_materials: vec![edge(1, 1, 1, 5)],
        };
        let before = snapshot.clone();

        let first = plan_production(&snapshot);
        let second = plan_production(&snapshot);

        assert_eq!(snapshot, before);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_catalog() {
        let plan = plan_production(&CatalogSnapshot::default());
        assert!(plan.items.is_empty());
        assert_eq!(plan.grand_total_value, Decimal::ZERO);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let snapshot = CatalogSnapshot {
            products: vec![product(7, "Premium", "100.00")],
            raw_materials: vec![material(1, "Steel", 10)],
            product_materials: vec![edge(1, 7, 1, 5)],
        };

        let json = serde_json::to_value(plan_production(&snapshot)).unwrap();

        assert_eq!(json["grandTotalValue"], "200.00");
        assert_eq!(json["items"][0]["productId"], 7);
        assert_eq!(json["items"][0]["productName"], "Premium");
        assert_eq!(json["items"][0]["producibleQuantity"], 2);
        assert_eq!(json["items"][0]["totalValue"], "200.00");
    }

    #[test]
    fn test_validate_values_rejects_out_of_range_products() {
        let mut snapshot = CatalogSnapshot {
            products: vec![product(1, "Premium", "100.00"), product(2, "Huge", "1")],
            ..CatalogSnapshot::default()
        };
        snapshot.products[1].value = dec("50000000000000000000000000000");

        match snapshot.validate_values() {
            Err(CatalogError::Invalid { field, message }) => {
                assert_eq!(field, "value");
                assert!(message.starts_with("Product 2"));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        snapshot.products.truncate(1);
        assert!(snapshot.validate_values().is_ok());
    }

    #[test]
    fn test_snapshot_parses_without_timestamps() {
        let json = r#"{
            "products": [{ "id": 1, "name": "Premium", "value": 100.00 }],
            "rawMaterials": [{ "id": 1, "name": "Steel", "stockQuantity": 10 }],
            "productMaterials": [{ "id": 1, "productId": 1, "rawMaterialId": 1, "requiredQuantity": 5 }]
        }"#;

        let snapshot: CatalogSnapshot = serde_json::from_str(json).unwrap();
        let plan = plan_production(&snapshot);

        assert_eq!(plan.items[0].producible_quantity, 2);
    }
}
