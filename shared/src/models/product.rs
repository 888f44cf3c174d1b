//! Product models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ProductMaterialDetail;
use crate::validation::normalize_money;

/// A sellable product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unit value, two decimal places
    pub value: Decimal,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a product
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(
        custom = "crate::validation::validate_not_blank",
        length(max = 255, message = "Name must be at most 255 characters")
    )]
    pub name: String,
    #[validate(custom = "crate::validation::validate_product_value")]
    pub value: Decimal,
}

impl ProductInput {
    /// Trim the name and round the value to cents
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            value: normalize_money(self.value),
        }
    }
}

/// A product together with its bill of materials
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithMaterials {
    #[serde(flatten)]
    pub product: Product,
    pub materials: Vec<ProductMaterialDetail>,
}
