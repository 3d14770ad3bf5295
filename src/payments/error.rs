use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Which pair of EET totals disagreed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EetMismatchKind {
    /// Declared EET sum vs. sum of the tax components
    TaxSum,
    /// Declared EET sum vs. the order amount
    OrderSum,
}

impl fmt::Display for EetMismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EetMismatchKind::TaxSum => f.write_str("EET tax sum"),
            EetMismatchKind::OrderSum => f.write_str("order sum"),
        }
    }
}

/// Failure raised while building a payment request
///
/// Construction stops at the first violation, so exactly one of these is
/// returned per call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Missing keys \"{}\"", .keys.join(", "))]
    MissingFields { keys: Vec<String> },

    #[error("Not allowed keys \"{}\"", .keys.join(", "))]
    UnexpectedFields { keys: Vec<String> },

    #[error("Item's name can't be empty or null (item #{index})")]
    InvalidItem { index: usize },

    #[error("Invalid value for \"{field}\": {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Payment price ({order_price}) and items price ({items_price}) do not match")]
    PriceMismatch {
        order_price: Decimal,
        items_price: Decimal,
    },

    #[error("EET sum ({eet_sum}) and {kind} ({other}) do not match")]
    EetMismatch {
        kind: EetMismatchKind,
        eet_sum: Decimal,
        other: Decimal,
    },
}

impl ValidationError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn missing_fields(keys: Vec<String>) -> Self {
        Self::MissingFields { keys }
    }

    pub fn unexpected_fields(keys: Vec<String>) -> Self {
        Self::UnexpectedFields { keys }
    }

    pub fn invalid_item(index: usize) -> Self {
        Self::InvalidItem { index }
    }

    pub fn invalid_value(field: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    pub fn price_mismatch(order_price: Decimal, items_price: Decimal) -> Self {
        Self::PriceMismatch {
            order_price,
            items_price,
        }
    }

    pub fn eet_mismatch(kind: EetMismatchKind, eet_sum: Decimal, other: Decimal) -> Self {
        Self::EetMismatch {
            kind,
            eet_sum,
            other,
        }
    }
}
