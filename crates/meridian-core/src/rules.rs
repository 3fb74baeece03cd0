//! # Pricing Rules
//!
//! Discount and tax rules expressed as data.
//!
//! ## Rule Book Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            RuleBook                                     │
//! │                                                                         │
//! │  DiscountTable                         TaxTable                         │
//! │  ─────────────                         ────────                         │
//! │  category ─► CategoryDiscounts         country ─► CountryTaxes          │
//! │               ├── tier ─► Ladder                   ├── category ─► Rate │
//! │               └── default Ladder                   └── default Rate?    │
//! │                                                                         │
//! │  Ladder = ordered rungs, first match wins, no match = 0%               │
//! │  Rung   = [subtotal > over] AND [points > points_over] ─► Rate         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Categories never share a table. Adding a tier or a category means adding
//! an entry here, not a new branch in the engine.

use std::collections::BTreeMap;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Category, CustomerTier, Rate, TaxCountry};
use crate::validation::validate_rate_bps;

// =============================================================================
// Discount Ladder
// =============================================================================

/// One step of a discount ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rung {
    /// Subtotal must be strictly greater than this.
    pub over: Option<Money>,
    /// Loyalty points must be strictly greater than this.
    pub points_over: Option<u64>,
    pub rate: Rate,
}

impl Rung {
    /// A rung that always matches.
    pub const fn flat(rate: Rate) -> Self {
        Rung {
            over: None,
            points_over: None,
            rate,
        }
    }

    /// A rung gated on the subtotal.
    pub const fn over(threshold: Money, rate: Rate) -> Self {
        Rung {
            over: Some(threshold),
            points_over: None,
            rate,
        }
    }

    /// A rung gated on the loyalty point balance.
    pub const fn points_over(points: u64, rate: Rate) -> Self {
        Rung {
            over: None,
            points_over: Some(points),
            rate,
        }
    }

    fn is_unconditional(&self) -> bool {
        self.over.is_none() && self.points_over.is_none()
    }

    fn matches(&self, subtotal: Money, loyalty_points: u64) -> bool {
        let subtotal_ok = self.over.map_or(true, |over| subtotal > over);
        let points_ok = self.points_over.map_or(true, |min| loyalty_points > min);
        subtotal_ok && points_ok
    }
}

/// Ordered discount rungs for one (category, tier) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ladder {
    rungs: Vec<Rung>,
}

impl Ladder {
    pub fn new(rungs: Vec<Rung>) -> Self {
        Ladder { rungs }
    }

    /// A ladder that never discounts.
    pub fn none() -> Self {
        Ladder::default()
    }

    pub fn rungs(&self) -> &[Rung] {
        &self.rungs
    }

    /// First matching rung's rate, or zero.
    pub fn rate_for(&self, subtotal: Money, loyalty_points: u64) -> Rate {
        self.rungs
            .iter()
            .find(|rung| rung.matches(subtotal, loyalty_points))
            .map(|rung| rung.rate)
            .unwrap_or_default()
    }

    /// Checks rate bounds and rung ordering.
    ///
    /// ## Rules
    /// - Every rate is at most 100%
    /// - Subtotal thresholds strictly descend (highest tier first)
    /// - Nothing follows an unconditional rung
    pub fn validate(&self) -> CoreResult<()> {
        let mut last_over: Option<Money> = None;

        for (idx, rung) in self.rungs.iter().enumerate() {
            validate_rate_bps(rung.rate.bps())?;

            if let Some(over) = rung.over {
                if let Some(prev) = last_over {
                    if over >= prev {
                        return Err(ladder_error("subtotal thresholds must strictly descend"));
                    }
                }
                last_over = Some(over);
            }

            if rung.is_unconditional() && idx + 1 != self.rungs.len() {
                return Err(ladder_error("an unconditional rung must be last"));
            }
        }

        Ok(())
    }
}

fn ladder_error(reason: &str) -> crate::error::PricingError {
    ValidationError::InvalidFormat {
        field: "discount ladder".to_string(),
        reason: reason.to_string(),
    }
    .into()
}

// =============================================================================
// Discount Table
// =============================================================================

/// Discount ladders owned by one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDiscounts {
    by_tier: BTreeMap<CustomerTier, Ladder>,
    default: Ladder,
}

impl CategoryDiscounts {
    /// Creates a table whose unmatched tiers use `default`.
    pub fn new(default: Ladder) -> Self {
        CategoryDiscounts {
            by_tier: BTreeMap::new(),
            default,
        }
    }

    /// Adds (or replaces) the ladder for one tier.
    pub fn tier(mut self, tier: CustomerTier, ladder: Ladder) -> Self {
        self.by_tier.insert(tier, ladder);
        self
    }

    /// Ladder for `tier`, falling back to the category default.
    pub fn ladder_for(&self, tier: CustomerTier) -> &Ladder {
        self.by_tier.get(&tier).unwrap_or(&self.default)
    }

    pub fn tiers(&self) -> impl Iterator<Item = (&CustomerTier, &Ladder)> {
        self.by_tier.iter()
    }

    pub fn default_ladder(&self) -> &Ladder {
        &self.default
    }

    fn validate(&self) -> CoreResult<()> {
        self.default.validate()?;
        for ladder in self.by_tier.values() {
            ladder.validate()?;
        }
        Ok(())
    }
}

/// Discount rules for every category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscountTable {
    categories: BTreeMap<Category, CategoryDiscounts>,
}

impl DiscountTable {
    pub fn new() -> Self {
        DiscountTable::default()
    }

    pub fn category(mut self, category: Category, discounts: CategoryDiscounts) -> Self {
        self.categories.insert(category, discounts);
        self
    }

    pub fn get(&self, category: Category) -> Option<&CategoryDiscounts> {
        self.categories.get(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&Category, &CategoryDiscounts)> {
        self.categories.iter()
    }

    /// Resolves the discount rate. Categories without a table discount 0%.
    pub fn rate_for(
        &self,
        category: Category,
        tier: CustomerTier,
        subtotal: Money,
        loyalty_points: u64,
    ) -> Rate {
        self.categories
            .get(&category)
            .map(|table| table.ladder_for(tier).rate_for(subtotal, loyalty_points))
            .unwrap_or_default()
    }

    pub fn validate(&self) -> CoreResult<()> {
        for table in self.categories.values() {
            table.validate()?;
        }
        Ok(())
    }
}

// =============================================================================
// Tax Table
// =============================================================================

/// Tax rates for one country class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryTaxes {
    by_category: BTreeMap<Category, Rate>,
    default: Option<Rate>,
}

impl CountryTaxes {
    /// Creates a table that falls back to `default` for unlisted categories.
    pub fn with_default(default: Rate) -> Self {
        CountryTaxes {
            by_category: BTreeMap::new(),
            default: Some(default),
        }
    }

    /// Creates a table with no fallback: unlisted categories are rejected.
    pub fn strict() -> Self {
        CountryTaxes::default()
    }

    pub fn category(mut self, category: Category, rate: Rate) -> Self {
        self.by_category.insert(category, rate);
        self
    }

    pub fn rate_for(&self, category: Category) -> Option<Rate> {
        self.by_category.get(&category).copied().or(self.default)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&Category, &Rate)> {
        self.by_category.iter()
    }

    pub fn default_rate(&self) -> Option<Rate> {
        self.default
    }

    fn validate(&self) -> CoreResult<()> {
        for rate in self.by_category.values().chain(self.default.iter()) {
            validate_rate_bps(rate.bps())?;
        }
        Ok(())
    }
}

/// Tax rules for every country class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxTable {
    countries: BTreeMap<TaxCountry, CountryTaxes>,
}

impl TaxTable {
    pub fn new() -> Self {
        TaxTable::default()
    }

    pub fn country(mut self, country: TaxCountry, taxes: CountryTaxes) -> Self {
        self.countries.insert(country, taxes);
        self
    }

    pub fn countries(&self) -> impl Iterator<Item = (&TaxCountry, &CountryTaxes)> {
        self.countries.iter()
    }

    /// Resolves the tax rate, failing when no rate and no default exists.
    pub fn rate_for(&self, country: TaxCountry, category: Category) -> CoreResult<Rate> {
        self.countries
            .get(&country)
            .and_then(|taxes| taxes.rate_for(category))
            .ok_or_else(|| {
                ValidationError::MissingRate {
                    country: country.to_string(),
                    category: category.to_string(),
                }
                .into()
            })
    }

    pub fn validate(&self) -> CoreResult<()> {
        for taxes in self.countries.values() {
            taxes.validate()?;
        }
        Ok(())
    }
}

// =============================================================================
// Rule Book
// =============================================================================

/// The complete set of discount and tax rules the engine prices with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleBook {
    pub discounts: DiscountTable,
    pub taxes: TaxTable,
}

impl RuleBook {
    pub fn new(discounts: DiscountTable, taxes: TaxTable) -> Self {
        RuleBook { discounts, taxes }
    }

    /// The built-in rules.
    ///
    /// ## Discounts
    /// ```text
    /// electronics  premium   >1000 15%, else 10%
    ///              default   >1000  5%
    /// books        student   20%
    ///              premium   10%
    /// clothing     premium   >200 25%, >100 20%, else 15%
    ///              regular   >200 15%, >100 10%, else  5%
    /// generic      expert 30%, advanced 20%, intermediate 10%
    ///              default   loyalty points >1000 8%
    /// ```
    ///
    /// ## Taxes
    /// ```text
    ///              electronics  books  clothing  generic
    /// treaty           21%        0%      21%      15%
    /// domestic         16%        0%      16%      15%
    /// other            10%        0%      10%      15%
    /// ```
    pub fn standard() -> Self {
        let pct = Rate::from_percent;
        let major = |amount: i64| Money::from_major_minor(amount, 0);

        let discounts = DiscountTable::new()
            .category(
                Category::Electronics,
                CategoryDiscounts::new(Ladder::new(vec![Rung::over(major(1000), pct(5))])).tier(
                    CustomerTier::Premium,
                    Ladder::new(vec![Rung::over(major(1000), pct(15)), Rung::flat(pct(10))]),
                ),
            )
            .category(
                Category::Books,
                CategoryDiscounts::new(Ladder::none())
                    .tier(CustomerTier::Student, Ladder::new(vec![Rung::flat(pct(20))]))
                    .tier(CustomerTier::Premium, Ladder::new(vec![Rung::flat(pct(10))])),
            )
            .category(
                Category::Clothing,
                CategoryDiscounts::new(Ladder::none())
                    .tier(
                        CustomerTier::Premium,
                        Ladder::new(vec![
                            Rung::over(major(200), pct(25)),
                            Rung::over(major(100), pct(20)),
                            Rung::flat(pct(15)),
                        ]),
                    )
                    .tier(
                        CustomerTier::Regular,
                        Ladder::new(vec![
                            Rung::over(major(200), pct(15)),
                            Rung::over(major(100), pct(10)),
                            Rung::flat(pct(5)),
                        ]),
                    ),
            )
            .category(
                Category::Generic,
                CategoryDiscounts::new(Ladder::new(vec![Rung::points_over(1000, pct(8))]))
                    .tier(CustomerTier::Expert, Ladder::new(vec![Rung::flat(pct(30))]))
                    .tier(CustomerTier::Advanced, Ladder::new(vec![Rung::flat(pct(20))]))
                    .tier(CustomerTier::Intermediate, Ladder::new(vec![Rung::flat(pct(10))])),
            );

        let country = |goods: u32| {
            CountryTaxes::with_default(pct(goods))
                .category(Category::Electronics, pct(goods))
                .category(Category::Books, Rate::zero())
                .category(Category::Clothing, pct(goods))
                .category(Category::Generic, pct(15))
        };

        let taxes = TaxTable::new()
            .country(TaxCountry::Treaty, country(21))
            .country(TaxCountry::Domestic, country(16))
            .country(TaxCountry::Other, country(10));

        RuleBook { discounts, taxes }
    }

    /// Validates every table in the book.
    pub fn validate(&self) -> CoreResult<()> {
        self.discounts.validate()?;
        self.taxes.validate()?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn major(amount: i64) -> Money {
        Money::from_major_minor(amount, 0)
    }

    #[test]
    fn test_standard_book_is_valid() {
        assert!(RuleBook::standard().validate().is_ok());
    }

    #[test]
    fn test_ladder_first_match_wins() {
        let ladder = Ladder::new(vec![
            Rung::over(major(200), Rate::from_percent(25)),
            Rung::over(major(100), Rate::from_percent(20)),
            Rung::flat(Rate::from_percent(15)),
        ]);
        assert_eq!(ladder.rate_for(major(250), 0), Rate::from_percent(25));
        assert_eq!(ladder.rate_for(major(200), 0), Rate::from_percent(20));
        assert_eq!(ladder.rate_for(major(100), 0), Rate::from_percent(15));
    }

    #[test]
    fn test_empty_ladder_is_zero() {
        assert!(Ladder::none().rate_for(major(1_000_000), 10_000).is_zero());
    }

    #[test]
    fn test_points_rung_is_strict() {
        let ladder = Ladder::new(vec![Rung::points_over(1000, Rate::from_percent(8))]);
        assert!(ladder.rate_for(major(100), 1000).is_zero());
        assert_eq!(ladder.rate_for(major(100), 1001), Rate::from_percent(8));
    }

    #[test]
    fn test_electronics_thresholds() {
        let book = RuleBook::standard();
        let rate = |tier, subtotal| book.discounts.rate_for(Category::Electronics, tier, subtotal, 0);

        assert_eq!(rate(CustomerTier::Premium, major(1500)), Rate::from_percent(15));
        assert_eq!(rate(CustomerTier::Premium, major(1000)), Rate::from_percent(10));
        assert_eq!(rate(CustomerTier::Regular, major(1001)), Rate::from_percent(5));
        assert!(rate(CustomerTier::Regular, major(1000)).is_zero());
        assert!(rate(CustomerTier::Unrecognized, major(999)).is_zero());
    }

    #[test]
    fn test_books_tiers() {
        let book = RuleBook::standard();
        let rate = |tier| book.discounts.rate_for(Category::Books, tier, major(30), 0);

        assert_eq!(rate(CustomerTier::Student), Rate::from_percent(20));
        assert_eq!(rate(CustomerTier::Premium), Rate::from_percent(10));
        assert!(rate(CustomerTier::Regular).is_zero());
    }

    #[test]
    fn test_generic_levels_and_loyalty() {
        let book = RuleBook::standard();
        let rate = |tier, points| book.discounts.rate_for(Category::Generic, tier, major(100), points);

        assert_eq!(rate(CustomerTier::Expert, 0), Rate::from_percent(30));
        assert_eq!(rate(CustomerTier::Intermediate, 0), Rate::from_percent(10));
        assert_eq!(rate(CustomerTier::Regular, 1500), Rate::from_percent(8));
        assert!(rate(CustomerTier::Novice, 10).is_zero());
    }

    #[test]
    fn test_missing_category_table_discounts_nothing() {
        let table = DiscountTable::new();
        assert!(table
            .rate_for(Category::Books, CustomerTier::Premium, major(10), 0)
            .is_zero());
    }

    #[test]
    fn test_tax_lookup() {
        let book = RuleBook::standard();
        assert_eq!(
            book.taxes.rate_for(TaxCountry::Treaty, Category::Electronics).unwrap(),
            Rate::from_percent(21)
        );
        assert!(book.taxes.rate_for(TaxCountry::Treaty, Category::Books).unwrap().is_zero());
        assert_eq!(
            book.taxes.rate_for(TaxCountry::Other, Category::Generic).unwrap(),
            Rate::from_percent(15)
        );
    }

    #[test]
    fn test_tax_lookup_without_default_fails() {
        let taxes = TaxTable::new().country(
            TaxCountry::Domestic,
            CountryTaxes::strict().category(Category::Books, Rate::zero()),
        );

        assert!(taxes.rate_for(TaxCountry::Domestic, Category::Books).is_ok());
        let err = taxes
            .rate_for(TaxCountry::Domestic, Category::Clothing)
            .unwrap_err();
        assert!(matches!(err.validation(), ValidationError::MissingRate { .. }));
        assert!(taxes.rate_for(TaxCountry::Treaty, Category::Books).is_err());
    }

    #[test]
    fn test_ladder_validation() {
        let ascending = Ladder::new(vec![
            Rung::over(major(100), Rate::from_percent(10)),
            Rung::over(major(200), Rate::from_percent(20)),
        ]);
        assert!(ascending.validate().is_err());

        let shadowed = Ladder::new(vec![
            Rung::flat(Rate::from_percent(5)),
            Rung::over(major(100), Rate::from_percent(10)),
        ]);
        assert!(shadowed.validate().is_err());

        let too_generous = Ladder::new(vec![Rung::flat(Rate::from_bps(10_001))]);
        assert!(too_generous.validate().is_err());
    }

    #[test]
    fn test_tax_rate_validation() {
        let book = RuleBook::new(
            DiscountTable::new(),
            TaxTable::new().country(
                TaxCountry::Other,
                CountryTaxes::with_default(Rate::from_bps(12_000)),
            ),
        );
        assert!(book.validate().is_err());
    }
}
