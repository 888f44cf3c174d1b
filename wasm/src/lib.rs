//! WebAssembly module for the inventory production planner
//!
//! Provides client-side computation for:
//! - Previewing the production suggestion for a catalog snapshot
//! - "What if" restocking before the stock is recorded
//! - Raw material name matching, to warn before a create merges

use wasm_bindgen::prelude::*;

use shared::{plan_production, Catalog, CatalogSnapshot, ProductionSuggestion, RawMaterialInput};

fn describe(context: &str, error: impl std::fmt::Display) -> String {
    format!("{}: {}", context, error)
}

fn parse_snapshot(snapshot_json: &str) -> Result<CatalogSnapshot, String> {
    let snapshot: CatalogSnapshot = serde_json::from_str(snapshot_json)
        .map_err(|e| describe("Invalid snapshot JSON", e))?;
    snapshot
        .validate_values()
        .map_err(|e| describe("Invalid snapshot", e))?;
    Ok(snapshot)
}

fn suggestion_json(suggestion: &ProductionSuggestion) -> Result<String, String> {
    serde_json::to_string(suggestion).map_err(|e| describe("Failed to serialize suggestion", e))
}

fn plan_snapshot(snapshot_json: &str) -> Result<String, String> {
    let snapshot = parse_snapshot(snapshot_json)?;
    suggestion_json(&plan_production(&snapshot))
}

fn plan_restocked(snapshot_json: &str, restock_json: &str) -> Result<String, String> {
    let snapshot = parse_snapshot(snapshot_json)?;
    let restocks: Vec<RawMaterialInput> = serde_json::from_str(restock_json)
        .map_err(|e| describe("Invalid restock JSON", e))?;

    let mut catalog = Catalog::from_snapshot(snapshot);
    for restock in restocks {
        catalog
            .create_raw_material(restock)
            .map_err(|e| describe("Restock rejected", e))?;
    }

    suggestion_json(&plan_production(&catalog.snapshot()))
}

/// Compute the production suggestion for a JSON catalog snapshot
#[wasm_bindgen]
pub fn suggest_production(snapshot_json: &str) -> Result<String, JsValue> {
    plan_snapshot(snapshot_json).map_err(|e| JsValue::from_str(&e))
}

/// Apply restocks (`[{ "name", "stockQuantity" }]`) to a snapshot, then plan.
///
/// Restocks merge into existing materials by name exactly as a create would;
/// unknown names become new materials.
#[wasm_bindgen]
pub fn simulate_restock(snapshot_json: &str, restock_json: &str) -> Result<String, JsValue> {
    plan_restocked(snapshot_json, restock_json).map_err(|e| JsValue::from_str(&e))
}

/// Case-insensitive key two raw material names must share to merge
#[wasm_bindgen]
pub fn material_name_key(name: &str) -> String {
    shared::material_name_key(name)
}
