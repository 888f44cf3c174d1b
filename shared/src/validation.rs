//! Validation utilities for catalog inputs

use std::borrow::Cow;

use rust_decimal::{Decimal, RoundingStrategy};
use validator::{ValidationError, ValidationErrors};

/// Decimal places kept for product values
pub const MONEY_SCALE: u32 = 2;

/// Smallest accepted product value (0.01)
pub const MIN_PRODUCT_VALUE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest value a NUMERIC(12,2) column holds (9,999,999,999.99)
pub const MAX_PRODUCT_VALUE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Reject empty or whitespace-only text
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "Name must not be blank"));
    }
    Ok(())
}

/// Product values must be positive and fit the stored precision
pub fn validate_product_value(value: &Decimal) -> Result<(), ValidationError> {
    if *value < MIN_PRODUCT_VALUE {
        return Err(error("min_value", "Value must be at least 0.01"));
    }
    if *value > MAX_PRODUCT_VALUE {
        return Err(error("max_value", "Value must be at most 9999999999.99"));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(error("scale", "Value must have at most two decimal places"));
    }
    Ok(())
}

/// Round a monetary amount to cents, halves away from zero
pub fn normalize_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Wire name of a struct field: `stock_quantity` becomes `stockQuantity`
pub fn camel_case_field(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = !name.is_empty();
        } else if upper_next {
            name.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            name.push(c);
        }
    }
    name
}

/// First failing field (as named on the wire) and its message, in field-name order
pub fn first_validation_failure(errors: &ValidationErrors) -> Option<(String, String)> {
    errors
        .field_errors()
        .into_iter()
        .min_by_key(|(field, _)| *field)
        .and_then(|(field, field_errors)| {
            let field = camel_case_field(field);
            field_errors.first().map(|error| {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("{} failed {} validation", field, error.code),
                };
                (field, message)
            })
        })
}
