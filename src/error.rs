//! Error types for the ACH encoder.

use std::fmt;
use thiserror::Error;

/// Result type alias for encoder operations
pub type Result<T> = std::result::Result<T, AchError>;

/// Errors that can occur while building or loading an ACH file.
#[derive(Error, Debug)]
pub enum AchError {
    /// A field failed validation while constructing a record
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: ValidationReason,
    },

    /// Appending would overflow a fixed-width computed field
    #[error("cannot append: {field} would exceed {max}")]
    CapacityExceeded { field: &'static str, max: u64 },

    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid payment instruction record
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: ach-encoder <header.csv> <entries.csv>")]
    MissingArgument,
}

impl AchError {
    /// Shorthand for a [`AchError::Validation`] error.
    pub fn invalid(field: &'static str, reason: ValidationReason) -> Self {
        AchError::Validation { field, reason }
    }

    /// Returns the offending field name for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AchError::Validation { field, .. } | AchError::CapacityExceeded { field, .. } => {
                Some(field)
            }
            _ => None,
        }
    }
}

/// The constraint a field value violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// Required field was empty
    Missing,

    /// Value is wider than the field
    TooLong { max: usize, actual: usize },

    /// Fixed-width field received a value of the wrong width
    WrongLength { expected: usize, actual: usize },

    /// Numeric field contained something other than ASCII digits
    NotNumeric,

    /// Value contained characters outside printable ASCII
    InvalidCharacters,

    /// Value must be upper-case letters or digits only
    NotUppercaseAlphanumeric,

    /// Amount was zero or negative
    NonPositiveAmount,

    /// Amount does not fit the field in cents
    AmountTooLarge,

    /// Code is not a member of the enumeration
    UnknownCode(String),
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::Missing => write!(f, "value is required"),
            ValidationReason::TooLong { max, actual } => {
                write!(f, "{} characters exceeds maximum of {}", actual, max)
            }
            ValidationReason::WrongLength { expected, actual } => {
                write!(f, "expected exactly {} characters, got {}", expected, actual)
            }
            ValidationReason::NotNumeric => write!(f, "must contain digits only"),
            ValidationReason::InvalidCharacters => {
                write!(f, "must contain printable ASCII characters only")
            }
            ValidationReason::NotUppercaseAlphanumeric => {
                write!(f, "must be a single character A-Z or 0-9")
            }
            ValidationReason::NonPositiveAmount => write!(f, "amount must be positive"),
            ValidationReason::AmountTooLarge => write!(f, "amount does not fit the field"),
            ValidationReason::UnknownCode(code) => write!(f, "unknown code '{}'", code),
        }
    }
}
