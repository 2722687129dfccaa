//! Feature builder: operator input to the canonical feature vector.
//!
//! Pure and deterministic. Amounts are validated rather than clamped, so a bad
//! value from an upstream form fails here instead of producing a silent score.

use crate::artifacts::CategoryEncoder;
use crate::domain::{FeatureVector, ReceivableInput};
use crate::error::AppError;

/// Reject negative amounts and payments above the opening balance.
pub fn validate_amounts(input: &ReceivableInput) -> Result<(), AppError> {
    if input.opening_balance < 0 {
        return Err(AppError::invalid_input(format!(
            "Opening balance must not be negative (got {}).",
            input.opening_balance
        )));
    }
    if input.amount_paid < 0 {
        return Err(AppError::invalid_input(format!(
            "Amount paid must not be negative (got {}).",
            input.amount_paid
        )));
    }
    if input.amount_paid > input.opening_balance {
        return Err(AppError::invalid_input(format!(
            "Amount paid ({}) exceeds the opening balance ({}).",
            input.amount_paid, input.opening_balance
        )));
    }
    Ok(())
}

/// Build `[tax_year, opening_balance, amount_paid, percent_paid, category_code]`.
pub fn build_features(
    input: &ReceivableInput,
    encoder: &CategoryEncoder,
) -> Result<FeatureVector, AppError> {
    validate_amounts(input)?;
    let category_code = encoder.lookup(&input.tax_category)?;

    Ok(FeatureVector([
        f64::from(input.tax_year),
        input.opening_balance as f64,
        input.amount_paid as f64,
        input.percent_paid(),
        f64::from(category_code),
    ]))
}
