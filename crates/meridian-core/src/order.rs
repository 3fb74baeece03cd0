//! # Order Quotes
//!
//! Prices a whole order (or enrollment basket) line by line.
//!
//! Each line is priced independently by [`PricingEngine::price`]; the order
//! totals are plain sums, so the per-line invariant
//! `total == subtotal - discount + tax` carries over to the order.

use serde::{Deserialize, Serialize};

use crate::engine::PricingEngine;
use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{balance, CustomerContext, LineItem, PricingResult};

/// A priced order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuote {
    pub lines: Vec<PricingResult>,
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderQuote {
    fn from_lines(lines: Vec<PricingResult>) -> CoreResult<Self> {
        let sum = |pick: fn(&PricingResult) -> Money, field: &str| -> CoreResult<Money> {
            lines.iter().try_fold(Money::zero(), |acc, line| {
                acc.checked_add(pick(line)).ok_or_else(|| {
                    ValidationError::Overflow {
                        field: field.to_string(),
                    }
                    .into()
                })
            })
        };

        let subtotal = sum(PricingResult::subtotal, "order subtotal")?;
        let discount = sum(PricingResult::discount, "order discount")?;
        let tax = sum(PricingResult::tax, "order tax")?;
        let total = sum(PricingResult::total, "order total")?;

        Ok(OrderQuote {
            lines,
            subtotal,
            discount,
            tax,
            total,
        })
    }

    pub fn is_balanced(&self) -> bool {
        self.lines.iter().all(PricingResult::is_balanced)
            && balance(self.subtotal, self.discount, self.tax) == Some(self.total)
    }
}

impl PricingEngine {
    /// Prices every line of an order for one customer.
    ///
    /// ## Errors
    /// - Empty order → `InvalidInput`
    /// - Any invalid line → that line's `InvalidInput`; nothing is returned
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::engine::PricingEngine;
    /// use meridian_core::money::Money;
    /// use meridian_core::types::{Category, CustomerContext, CustomerTier, LineItem, TaxCountry};
    ///
    /// let engine = PricingEngine::standard();
    /// let items = [
    ///     LineItem::new(Category::Electronics, Money::from_major_minor(1500, 0), 1).unwrap(),
    ///     LineItem::new(Category::Books, Money::from_major_minor(30, 0), 1).unwrap(),
    /// ];
    /// let ctx = CustomerContext::new(CustomerTier::Premium, TaxCountry::Treaty);
    ///
    /// let quote = engine.quote_order(&items, &ctx).unwrap();
    /// assert_eq!(quote.lines.len(), 2);
    /// assert!(quote.is_balanced());
    /// ```
    pub fn quote_order(&self, items: &[LineItem], customer: &CustomerContext) -> CoreResult<OrderQuote> {
        if items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }

        let lines = items
            .iter()
            .map(|item| self.price(item, customer))
            .collect::<CoreResult<Vec<_>>>()?;

        OrderQuote::from_lines(lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, CustomerTier, TaxCountry};

    fn line(category: Category, cents: i64, quantity: i64) -> LineItem {
        LineItem::new(category, Money::from_cents(cents), quantity).unwrap()
    }

    #[test]
    fn test_order_sums_lines() {
        let engine = PricingEngine::standard();
        let ctx = CustomerContext::new(CustomerTier::Premium, TaxCountry::Treaty);
        let items = [line(Category::Electronics, 150000, 1), line(Category::Books, 3000, 1)];

        let quote = engine.quote_order(&items, &ctx).unwrap();

        // Electronics: 1500 - 225 + 267.75; books: 30 - 3 (premium 10%) + 0
        assert_eq!(quote.subtotal.cents(), 153000);
        assert_eq!(quote.discount.cents(), 22800);
        assert_eq!(quote.tax.cents(), 26775);
        assert_eq!(quote.total.cents(), 156975);
        assert!(quote.is_balanced());
    }

    #[test]
    fn test_lines_keep_input_order() {
        let engine = PricingEngine::standard();
        let ctx = CustomerContext::new(CustomerTier::Regular, TaxCountry::Other);
        let items = [line(Category::Books, 1000, 1), line(Category::Generic, 500, 4)];

        let quote = engine.quote_order(&items, &ctx).unwrap();
        assert_eq!(quote.lines[0].subtotal().cents(), 1000);
        assert_eq!(quote.lines[1].subtotal().cents(), 2000);
    }

    #[test]
    fn test_empty_order_is_rejected() {
        let engine = PricingEngine::standard();
        let ctx = CustomerContext::default();
        let err = engine.quote_order(&[], &ctx).unwrap_err();
        assert!(matches!(err.validation(), ValidationError::Required { .. }));
    }

    #[test]
    fn test_one_bad_line_rejects_the_order() {
        let engine = PricingEngine::standard();
        let ctx = CustomerContext::default();
        let bad: LineItem =
            serde_json::from_str(r#"{"category":"generic","unit_price":100,"quantity":0}"#).unwrap();

        assert!(engine
            .quote_order(&[line(Category::Generic, 100, 1), bad], &ctx)
            .is_err());
    }

    #[test]
    fn test_quote_serializes_to_json() {
        let engine = PricingEngine::standard();
        let ctx = CustomerContext::new(CustomerTier::Student, TaxCountry::Domestic);
        let quote = engine.quote_order(&[line(Category::Books, 5000, 2)], &ctx).unwrap();

        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["subtotal"], 10000);
        assert_eq!(json["discount"], 2000);
        assert_eq!(json["total"], 8000);
    }
}
