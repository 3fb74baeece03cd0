//! # Ledger Error Types
//!
//! Error types for the ledger layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  PricingError (meridian-core)   io / toml errors                       │
//! │       │                               │                                 │
//! │       └───────────────┬───────────────┘                                 │
//! │                       ▼                                                 │
//! │  LedgerError (this module) ← Adds customer and config context          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller (order / enrollment workflow)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use meridian_core::{PricingError, ValidationError};
use thiserror::Error;

/// Ledger operation errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No customer with this id.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Insert of an id that already exists.
    #[error("Customer already exists: {0}")]
    DuplicateCustomer(String),

    /// Config or rule book contents are unusable.
    ///
    /// ## When This Occurs
    /// - Unknown category, tier or country key in a rule book
    /// - `max_entries = 0` with the cache enabled
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Pricing rejected the input.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for the expected shape.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Rule book could not be rendered as TOML.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::Pricing(err.into())
    }
}

impl LedgerError {
    /// True when the caller sent something that can never be priced.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, LedgerError::Pricing(_))
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LedgerError::CustomerNotFound("abc".to_string());
        assert_eq!(err.to_string(), "Customer not found: abc");
    }

    #[test]
    fn test_validation_becomes_invalid_input() {
        let err: LedgerError = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into();
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "Invalid input: quantity must be positive");
    }
}
