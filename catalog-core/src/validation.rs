//! Validation error types

use std::fmt;

/// Validation error for product input
///
/// The `Display` text is what clients see in the error envelope, so the
/// wording of each variant is part of the HTTP contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name, price or category missing from a create request
    MissingRequired,

    /// Field is present but blank
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Price is zero or negative
    NonPositivePrice,

    /// Stock is below zero
    NegativeStock,

    /// Number does not fit the storage column
    OutOfRange { field: &'static str },

    /// Query parameter is not a number
    InvalidNumber { field: &'static str },

    /// Update request carries no fields
    NoFields,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired => write!(f, "Name, price, and category are required"),
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::NonPositivePrice => write!(f, "Price must be greater than 0"),
            Self::NegativeStock => write!(f, "Stock cannot be negative"),
            Self::OutOfRange { field } => write!(f, "{} is out of range", field),
            Self::InvalidNumber { field } => write!(f, "{} must be a valid number", field),
            Self::NoFields => write!(f, "No fields to update"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "Name",
            max: 255,
        };
        assert_eq!(
            err.to_string(),
            "Name exceeds maximum length of 255 characters"
        );
    }

    #[test]
    fn client_facing_messages() {
        assert_eq!(
            ValidationError::NonPositivePrice.to_string(),
            "Price must be greater than 0"
        );
        assert_eq!(ValidationError::NoFields.to_string(), "No fields to update");
        assert_eq!(
            ValidationError::MissingRequired.to_string(),
            "Name, price, and category are required"
        );
    }
}
