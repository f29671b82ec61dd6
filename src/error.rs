//! Error types for loan construction, simulation and I/O

use thiserror::Error;

use crate::money::MAX_AMOUNT;

#[derive(Debug, Error)]
pub enum LoanError {
    /// A configuration value is out of range or inconsistent with another field
    #[error("Invalid parameter: {field} - {reason}")]
    InvalidParameter { field: String, reason: String },

    /// An operation was invoked before (or after) the point in the lifecycle it requires
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoanError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LoanError::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;

/// Reject NaN and infinities for a named numeric field
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LoanError::invalid(field, format!("must be finite, got {}", value)))
    }
}

/// Reject negative (and non-finite) values for a named amount
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(LoanError::invalid(field, format!("must be >= 0, got {}", value)));
    }
    Ok(())
}

/// Reject negative amounts and amounts above `MAX_AMOUNT`
pub(crate) fn ensure_amount(field: &str, value: f64) -> Result<()> {
    ensure_non_negative(field, value)?;
    if value > MAX_AMOUNT {
        return Err(LoanError::invalid(
            field,
            format!("must be <= {:e}, got {}", MAX_AMOUNT, value),
        ));
    }
    Ok(())
}

/// Reject values outside the closed unit interval
pub(crate) fn ensure_fraction(field: &str, value: f64) -> Result<()> {
    ensure_finite(field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(LoanError::invalid(field, format!("must be within [0, 1], got {}", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_names_field() {
        let err = ensure_non_negative("loan_value", -1.0).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("loan_value"), "message was {}", msg);
        assert!(msg.contains(">= 0"));
    }

    #[test]
    fn test_fraction_bounds() {
        assert!(ensure_fraction("repayment_rate", 0.0).is_ok());
        assert!(ensure_fraction("repayment_rate", 1.0).is_ok());
        assert!(ensure_fraction("repayment_rate", 1.01).is_err());
        assert!(ensure_fraction("repayment_rate", -0.01).is_err());
        assert!(ensure_fraction("repayment_rate", f64::NAN).is_err());
    }

    #[test]
    fn test_amount_upper_bound() {
        assert!(ensure_amount("loan_value", MAX_AMOUNT).is_ok());
        assert!(ensure_amount("loan_value", 1e307).is_err());
        assert!(ensure_amount("loan_value", -0.01).is_err());
    }
}
