//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                      │
//! │  ├── PricingError     - The one failure kind pricing can surface       │
//! │  └── ValidationError  - Which field was wrong, and how                 │
//! │                                                                         │
//! │  meridian-ledger errors (separate crate)                               │
//! │  └── LedgerError      - Store, config and file failures                │
//! │                                                                         │
//! │  Flow: ValidationError → PricingError → LedgerError → caller           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing is a pure computation. Retrying with the same bad input cannot
//! succeed, so every error here is final for that input.

use thiserror::Error;

// =============================================================================
// Pricing Error
// =============================================================================

/// Errors produced by the pricing engine.
///
/// There is exactly one kind: the input was unusable. Unknown customer
/// tiers are NOT errors, they price at a zero discount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The line item, customer context or rule book was rejected.
    ///
    /// ## When This Occurs
    /// - Negative unit price
    /// - Quantity below 1
    /// - Subtotal overflows the money range
    /// - Unrecognized category or country string
    /// - No tax rate (and no country default) for the requested pair
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}

impl PricingError {
    /// Returns the underlying validation failure.
    pub fn validation(&self) -> &ValidationError {
        match self {
            PricingError::InvalidInput(inner) => inner,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid country code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Arithmetic left the representable money range.
    #[error("{field} overflows the supported money range")]
    Overflow { field: String },

    /// The rule book has no tax rate for this pair and no fallback.
    #[error("no tax rate for {category} in {country}")]
    MissingRate { country: String, category: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type CoreResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================
