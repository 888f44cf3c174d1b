//! Raw material models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A raw material and the quantity currently in stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    pub id: i64,
    pub name: String,
    /// Whole units on hand, never negative
    pub stock_quantity: i32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a raw material
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialInput {
    #[validate(
        custom = "crate::validation::validate_not_blank",
        length(max = 255, message = "Name must be at most 255 characters")
    )]
    pub name: String,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: i32,
}

impl RawMaterialInput {
    /// Trim surrounding whitespace from the name
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            ..self
        }
    }

    /// Uniqueness key for the requested name
    pub fn name_key(&self) -> String {
        material_name_key(&self.name)
    }
}

/// Result of a create request, which may have merged into an existing record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialCreated {
    #[serde(flatten)]
    pub material: RawMaterial,
    /// True when the stock was added to an existing material of the same name
    pub merged: bool,
}

/// Compact view of a raw material embedded in bill-of-materials listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialRef {
    pub id: i64,
    pub name: String,
    pub stock_quantity: i32,
}

impl From<&RawMaterial> for RawMaterialRef {
    fn from(material: &RawMaterial) -> Self {
        Self {
            id: material.id,
            name: material.name.clone(),
            stock_quantity: material.stock_quantity,
        }
    }
}

/// Case-insensitive identity of a raw material name.
///
/// Two names with the same key denote the same material: creating a material
/// whose key already exists adds to that material's stock.
pub fn material_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
