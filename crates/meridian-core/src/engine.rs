//! # Pricing Engine
//!
//! Turns a line item and a customer context into a priced result.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LineItem + CustomerContext                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. validate            price >= 0, quantity >= 1                       │
//! │  2. subtotal            unit_price × quantity                           │
//! │  3. discount rate       DiscountTable[category][tier] ladder            │
//! │  4. discount            subtotal × discount rate                        │
//! │  5. tax rate            TaxTable[country][category]                     │
//! │  6. tax                 (subtotal - discount) × tax rate                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricingResult { subtotal, discount, tax, total }                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tax is always charged on the discounted amount, never on the subtotal.
//!
//! The engine holds only an immutable [`RuleBook`], so it is `Send + Sync`
//! and can be shared by reference across threads without locking.

use crate::error::CoreResult;
use crate::rules::RuleBook;
use crate::types::{CustomerContext, LineItem, PricingResult};

/// Stateless pricing engine over a validated rule book.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    rules: RuleBook,
}

impl PricingEngine {
    /// Creates an engine after validating the rule book.
    pub fn new(rules: RuleBook) -> CoreResult<Self> {
        rules.validate()?;
        Ok(PricingEngine { rules })
    }

    /// Creates an engine with the built-in rule book.
    pub fn standard() -> Self {
        PricingEngine {
            rules: RuleBook::standard(),
        }
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Prices one line item for one customer.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::engine::PricingEngine;
    /// use meridian_core::money::Money;
    /// use meridian_core::types::{Category, CustomerContext, CustomerTier, LineItem, TaxCountry};
    ///
    /// let engine = PricingEngine::standard();
    /// let item = LineItem::new(Category::Electronics, Money::from_major_minor(1500, 0), 1).unwrap();
    /// let customer = CustomerContext::new(CustomerTier::Premium, TaxCountry::Treaty);
    ///
    /// let result = engine.price(&item, &customer).unwrap();
    /// assert_eq!(result.discount(), Money::from_major_minor(225, 0));
    /// assert_eq!(result.tax(), Money::from_major_minor(267, 75));
    /// assert_eq!(result.total(), Money::from_major_minor(1542, 75));
    /// ```
    ///
    /// ## Errors
    /// `PricingError::InvalidInput` for a negative price, a quantity below 1,
    /// an overflowing subtotal or total, or a missing tax rate.
    pub fn price(&self, item: &LineItem, customer: &CustomerContext) -> CoreResult<PricingResult> {
        // Items can arrive deserialized, bypassing LineItem::new.
        item.validate()?;

        let subtotal = item.subtotal()?;

        let discount_rate = self.rules.discounts.rate_for(
            item.category(),
            customer.tier,
            subtotal,
            customer.loyalty_points,
        );
        let discount = subtotal.percent_of(discount_rate);
        let discounted = subtotal - discount;

        let tax_rate = self.rules.taxes.rate_for(customer.country, item.category())?;
        let tax = discounted.percent_of(tax_rate);

        PricingResult::from_parts(subtotal, discount, tax)
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        PricingEngine::standard()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PricingError, ValidationError};
    use crate::money::Money;
    use crate::rules::{CountryTaxes, DiscountTable, TaxTable};
    use crate::types::{Category, CustomerTier, Rate, TaxCountry};

    fn item(category: Category, major: i64, quantity: i64) -> LineItem {
        LineItem::new(category, Money::from_major_minor(major, 0), quantity).unwrap()
    }

    fn customer(tier: CustomerTier, country: TaxCountry) -> CustomerContext {
        CustomerContext::new(tier, country)
    }

    #[test]
    fn test_scenario_premium_electronics_in_treaty_country() {
        let engine = PricingEngine::standard();
        let result = engine
            .price(
                &item(Category::Electronics, 1500, 1),
                &customer(CustomerTier::Premium, TaxCountry::Treaty),
            )
            .unwrap();

        assert_eq!(result.subtotal(), Money::from_major_minor(1500, 0));
        assert_eq!(result.discount(), Money::from_major_minor(225, 0));
        assert_eq!(result.discounted(), Money::from_major_minor(1275, 0));
        assert_eq!(result.tax(), Money::from_major_minor(267, 75));
        assert_eq!(result.total(), Money::from_major_minor(1542, 75));
    }

    #[test]
    fn test_scenario_regular_books_are_tax_exempt_in_treaty_country() {
        let engine = PricingEngine::standard();
        let result = engine
            .price(
                &item(Category::Books, 30, 1),
                &customer(CustomerTier::Regular, TaxCountry::Treaty),
            )
            .unwrap();

        assert!(result.discount().is_zero());
        assert!(result.tax().is_zero());
        assert_eq!(result.total(), Money::from_major_minor(30, 0));
    }

    #[test]
    fn test_scenario_loyal_regular_generic() {
        let engine = PricingEngine::standard();
        let result = engine
            .price(
                &item(Category::Generic, 100, 2),
                &customer(CustomerTier::Regular, TaxCountry::Domestic).with_loyalty_points(1500),
            )
            .unwrap();

        assert_eq!(result.subtotal(), Money::from_major_minor(200, 0));
        assert_eq!(result.discount(), Money::from_major_minor(16, 0));
        assert_eq!(result.tax(), Money::from_major_minor(27, 60));
        assert_eq!(result.total(), Money::from_major_minor(211, 60));
    }

    #[test]
    fn test_tax_is_charged_on_discounted_amount() {
        let engine = PricingEngine::standard();
        let ctx = customer(CustomerTier::Premium, TaxCountry::Domestic);
        let result = engine.price(&item(Category::Clothing, 150, 2), &ctx).unwrap();

        let tax_rate = engine
            .rules()
            .taxes
            .rate_for(TaxCountry::Domestic, Category::Clothing)
            .unwrap();
        assert!(!result.discount().is_zero());
        assert_eq!(
            result.tax(),
            (result.subtotal() - result.discount()).percent_of(tax_rate)
        );
        assert_ne!(result.tax(), result.subtotal().percent_of(tax_rate));
    }

    #[test]
    fn test_invariants_hold_across_rule_book() {
        let engine = PricingEngine::standard();
        let tiers = [
            CustomerTier::Regular,
            CustomerTier::Premium,
            CustomerTier::Student,
            CustomerTier::Novice,
            CustomerTier::Intermediate,
            CustomerTier::Advanced,
            CustomerTier::Expert,
            CustomerTier::Unrecognized,
        ];
        let prices = [0, 1, 99, 101, 30, 31, 201, 999, 1001, 25_000];

        for category in Category::ALL {
            for country in TaxCountry::ALL {
                for tier in tiers {
                    for price in prices {
                        for points in [0, 1001] {
                            let ctx = customer(tier, country).with_loyalty_points(points);
                            let result = engine.price(&item(category, price, 3), &ctx).unwrap();

                            assert!(result.is_balanced(), "{category} {country} {tier} {price}");
                            assert!(!result.discount().is_negative());
                            assert!(result.discount() <= result.subtotal());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_pricing_is_idempotent() {
        let engine = PricingEngine::standard();
        let line = LineItem::new(Category::Clothing, Money::from_cents(3333), 7).unwrap();
        let ctx = customer(CustomerTier::Regular, TaxCountry::Other);

        assert_eq!(engine.price(&line, &ctx).unwrap(), engine.price(&line, &ctx).unwrap());
    }

    #[test]
    fn test_unrecognized_tier_gets_zero_discount() {
        let engine = PricingEngine::standard();
        let result = engine
            .price(
                &item(Category::Books, 60, 1),
                &customer(CustomerTier::parse("premuim"), TaxCountry::Other),
            )
            .unwrap();

        assert!(result.discount().is_zero());
    }

    #[test]
    fn test_deserialized_bad_item_is_rejected() {
        let engine = PricingEngine::standard();
        let ctx = customer(CustomerTier::Regular, TaxCountry::Other);

        let zero_qty: LineItem =
            serde_json::from_str(r#"{"category":"books","unit_price":3000,"quantity":0}"#).unwrap();
        let negative: LineItem =
            serde_json::from_str(r#"{"category":"books","unit_price":-100,"quantity":1}"#).unwrap();

        for bad in [zero_qty, negative] {
            let err = engine.price(&bad, &ctx).unwrap_err();
            assert!(matches!(err, PricingError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_overflowing_subtotal_is_rejected() {
        let engine = PricingEngine::standard();
        let line = LineItem::new(Category::Generic, Money::from_cents(i64::MAX), 2).unwrap();
        let err = engine
            .price(&line, &customer(CustomerTier::Regular, TaxCountry::Other))
            .unwrap_err();
        assert!(matches!(err.validation(), ValidationError::Overflow { .. }));
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let engine = PricingEngine::standard();
        let line = LineItem::new(Category::Generic, Money::from_cents(i64::MAX / 10 * 9), 1).unwrap();
        let err = engine
            .price(&line, &customer(CustomerTier::Regular, TaxCountry::Other))
            .unwrap_err();
        assert_eq!(
            err.validation(),
            &ValidationError::Overflow {
                field: "total".to_string()
            }
        );
    }

    #[test]
    fn test_missing_tax_rate_is_rejected() {
        let rules = RuleBook::new(
            DiscountTable::new(),
            TaxTable::new().country(
                TaxCountry::Treaty,
                CountryTaxes::strict().category(Category::Books, Rate::zero()),
            ),
        );
        let engine = PricingEngine::new(rules).unwrap();
        let ctx = customer(CustomerTier::Regular, TaxCountry::Treaty);

        assert!(engine.price(&item(Category::Books, 10, 1), &ctx).is_ok());
        assert!(engine.price(&item(Category::Electronics, 10, 1), &ctx).is_err());
    }

    #[test]
    fn test_invalid_rule_book_is_rejected() {
        let rules = RuleBook::new(
            DiscountTable::new(),
            TaxTable::new().country(
                TaxCountry::Other,
                CountryTaxes::with_default(Rate::from_bps(20_000)),
            ),
        );
        assert!(PricingEngine::new(rules).is_err());
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = PricingEngine::standard();
        let line = item(Category::Electronics, 1500, 1);
        let ctx = customer(CustomerTier::Premium, TaxCountry::Treaty);
        let expected = engine.price(&line, &ctx).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| engine.price(&line, &ctx).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
