//! Error handling for the inventory planner server
//!
//! Every failure reaches the client as `{ "error": { "code", "message", "field"? } }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Client input errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// PostgreSQL SQLSTATE codes the catalog constraints raise
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// API field a named constraint guards
fn field_for_constraint(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("uq_raw_materials_name_key") => "name",
        Some("ck_raw_materials_stock_non_negative") => "stockQuantity",
        Some("ck_products_value_positive") => "value",
        Some("uq_product_materials_product_raw_material")
        | Some("fk_product_materials_raw_material") => "rawMaterialId",
        Some("fk_product_materials_product") => "productId",
        Some("ck_product_materials_required_positive") => "requiredQuantity",
        _ => "record",
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let Some(db_err) = err.as_database_error() else {
            return AppError::DatabaseError(err);
        };
        let code = db_err.code().map(|code| code.into_owned());
        let field = field_for_constraint(db_err.constraint()).to_string();

        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => AppError::DuplicateEntry(field),
            Some(FOREIGN_KEY_VIOLATION) => AppError::Conflict {
                resource: field,
                message: "The record is still referenced by a bill of materials, \
                          or references a record that no longer exists"
                    .to_string(),
            },
            Some(CHECK_VIOLATION) => AppError::Validation {
                field,
                message: "Value violates a catalog constraint".to_string(),
            },
            Some(NUMERIC_VALUE_OUT_OF_RANGE) => AppError::Validation {
                field: "stockQuantity".to_string(),
                message: "Quantity exceeds the supported range".to_string(),
            },
            _ => AppError::DatabaseError(err),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (field, message) = shared::first_validation_failure(&errors)
            .unwrap_or_else(|| ("input".to_string(), errors.to_string()));
        AppError::Validation { field, message }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: format!("A record with this {} already exists", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::Conflict { resource, message } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFLICT".to_string(),
                    message: message.clone(),
                    field: Some(resource.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                AppError::Validation {
                    field: "name".to_string(),
                    message: "Name must not be blank".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (AppError::DuplicateEntry("name".to_string()), StatusCode::CONFLICT),
            (
                AppError::Conflict {
                    resource: "rawMaterialId".to_string(),
                    message: "in use".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (AppError::NotFound("Product".to_string()), StatusCode::NOT_FOUND),
            (
                AppError::DatabaseError(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_constraint_fields() {
        assert_eq!(field_for_constraint(Some("uq_raw_materials_name_key")), "name");
        assert_eq!(
            field_for_constraint(Some("uq_product_materials_product_raw_material")),
            "rawMaterialId"
        );
        assert_eq!(field_for_constraint(Some("something_else")), "record");
        assert_eq!(field_for_constraint(None), "record");
    }

    #[test]
    fn test_non_database_sqlx_errors_stay_internal() {
        let error = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(error, AppError::DatabaseError(_)));
    }

    #[test]
    fn test_validation_errors_convert() {
        use validator::Validate;

        let input = shared::RawMaterialInput {
            name: "Steel".to_string(),
            stock_quantity: -1,
        };
        let error = AppError::from(input.validate().unwrap_err());

        match error {
            AppError::Validation { field, message } => {
                assert_eq!(field, "stockQuantity");
                assert_eq!(message, "Stock quantity cannot be negative");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
