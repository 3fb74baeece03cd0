//! # Validation Module
//!
//! Input validation utilities for Meridian.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Ledger (meridian-ledger)                                     │
//! │  ├── Customer ids, names, country codes                                │
//! │  └── Rule book files and config values                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Price and quantity bounds                                         │
//! │  └── Rate bounds                                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: PricingEngine                                                │
//! │  └── Re-checks every item before doing arithmetic                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use meridian_core::validation::{validate_quantity, validate_rate_bps};
//!
//! validate_quantity(2).unwrap();
//! assert!(validate_rate_bps(10_001).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Highest rate a rule may carry (100%).
pub const MAX_RATE_BPS: u32 = 10_000;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be at least 1
///
/// ## Example
/// ```rust
/// use meridian_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free courses, giveaways)
///
/// ## Example
/// ```rust
/// use meridian_core::money::Money;
/// use meridian_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_unit_price(Money::zero()).is_ok());
/// assert!(validate_unit_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - A discount above 100% would push the subtotal negative
pub fn validate_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0,
            max: MAX_RATE_BPS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer display name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an ISO 3166-1 alpha-2 country code and returns it upper-cased.
///
/// ## Example
/// ```rust
/// use meridian_core::validation::validate_country_code;
///
/// assert_eq!(validate_country_code("es").unwrap(), "ES");
/// assert!(validate_country_code("Spain").is_err());
/// ```
pub fn validate_country_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "country_code".to_string(),
        });
    }

    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "country_code".to_string(),
            reason: "must be a two-letter ISO country code".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a customer id (UUID string).
///
/// ## Example
/// ```rust
/// use meridian_core::validation::validate_customer_id;
///
/// assert!(validate_customer_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_customer_id("EST001").is_err());
/// ```
pub fn validate_customer_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customer_id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "customer_id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::zero()).is_ok());
        assert!(validate_unit_price(Money::from_cents(150000)).is_ok());
        assert!(validate_unit_price(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_rate_bps() {
        assert!(validate_rate_bps(0).is_ok());
        assert!(validate_rate_bps(2100).is_ok());
        assert!(validate_rate_bps(10_000).is_ok());
        assert!(validate_rate_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Carlos Martinez").is_ok());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_country_code() {
        assert_eq!(validate_country_code(" mx ").unwrap(), "MX");
        assert!(validate_country_code("").is_err());
        assert!(validate_country_code("E5").is_err());
        assert!(validate_country_code("ESP").is_err());
    }

    #[test]
    fn test_validate_customer_id() {
        assert!(validate_customer_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_customer_id("").is_err());
        assert!(validate_customer_id("not-a-uuid").is_err());
    }
}
