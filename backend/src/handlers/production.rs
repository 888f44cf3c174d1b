//! HTTP handlers for production planning

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::models::ProductionSuggestion;
use crate::services::ProductionService;
use crate::AppState;

/// Suggest what to produce from current stock, highest-value products first
pub async fn get_production_suggestion(
    State(state): State<AppState>,
) -> AppResult<Json<ProductionSuggestion>> {
    let service = ProductionService::new(state.db);
    let suggestion = service.suggest().await?;
    Ok(Json(suggestion))
}
