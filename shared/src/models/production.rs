//! Production suggestion models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product the plan recommends manufacturing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionItem {
    pub product_id: i64,
    pub product_name: String,
    /// Unit value the product was ranked by
    pub product_value: Decimal,
    /// Always at least 1
    pub producible_quantity: i64,
    /// `product_value * producible_quantity`, exact
    pub total_value: Decimal,
}

/// Ranked, stock-feasible production plan
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSuggestion {
    /// Descending product value; equal values keep catalog order
    pub items: Vec<SuggestionItem>,
    pub grand_total_value: Decimal,
}
