//! # Domain Types
//!
//! Core domain types used throughout Meridian.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │ CustomerContext │   │  PricingResult  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  category       │   │  tier           │   │  subtotal       │       │
//! │  │  unit_price     │   │  country        │   │  discount       │       │
//! │  │  quantity       │   │  loyalty_points │   │  tax, total     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Rate       │   │  CustomerTier   │   │   TaxCountry    │       │
//! │  │  bps (u32)      │   │  Regular ...    │   │  Domestic       │       │
//! │  │  2100 = 21%     │   │  Unrecognized   │   │  Treaty, Other  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_quantity, validate_unit_price};

// =============================================================================
// Rate
// =============================================================================

/// A fractional rate in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2100 bps = 21% (treaty electronics tax), 800 bps = 8% (loyalty discount)
///
/// Used for both discount rates and tax rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a whole percentage.
    ///
    /// ```rust
    /// use meridian_core::types::Rate;
    ///
    /// assert_eq!(Rate::from_percent(15).bps(), 1500);
    /// ```
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        Rate(pct * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Category
// =============================================================================

/// Product category of a line item. Each category owns its discount table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Electronics,
    Books,
    Clothing,
    /// Everything else, including courses.
    #[serde(alias = "general")]
    Generic,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Electronics,
        Category::Books,
        Category::Clothing,
        Category::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Books => "books",
            Category::Clothing => "clothing",
            Category::Generic => "generic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electronics" => Ok(Category::Electronics),
            "books" => Ok(Category::Books),
            "clothing" => Ok(Category::Clothing),
            "generic" | "general" => Ok(Category::Generic),
            _ => Err(ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: Category::ALL.iter().map(|c| c.as_str().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Customer Tier
// =============================================================================

/// Customer classification that refines the discount lookup.
///
/// Retail tiers (regular/premium/student) and learning-platform levels
/// (novice..expert) share one enum so one rule book covers both.
///
/// ## Unknown Tiers
/// Parsing never fails. Any unknown string becomes `Unrecognized`, which
/// matches no tier-specific ladder and prices with the category default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CustomerTier {
    Regular,
    Premium,
    Student,
    Novice,
    Intermediate,
    Advanced,
    Expert,
    Unrecognized,
}

impl CustomerTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerTier::Regular => "regular",
            CustomerTier::Premium => "premium",
            CustomerTier::Student => "student",
            CustomerTier::Novice => "novice",
            CustomerTier::Intermediate => "intermediate",
            CustomerTier::Advanced => "advanced",
            CustomerTier::Expert => "expert",
            CustomerTier::Unrecognized => "unrecognized",
        }
    }

    /// Parses a tier name, falling back to `Unrecognized`.
    ///
    /// ```rust
    /// use meridian_core::types::CustomerTier;
    ///
    /// assert_eq!(CustomerTier::parse("Premium"), CustomerTier::Premium);
    /// assert_eq!(CustomerTier::parse("premum"), CustomerTier::Unrecognized);
    /// ```
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "regular" => CustomerTier::Regular,
            "premium" => CustomerTier::Premium,
            "student" => CustomerTier::Student,
            "novice" => CustomerTier::Novice,
            "intermediate" => CustomerTier::Intermediate,
            "advanced" => CustomerTier::Advanced,
            "expert" => CustomerTier::Expert,
            _ => CustomerTier::Unrecognized,
        }
    }

    #[inline]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, CustomerTier::Unrecognized)
    }
}

impl Default for CustomerTier {
    fn default() -> Self {
        CustomerTier::Regular
    }
}

impl fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerTier {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CustomerTier::parse(s))
    }
}

impl From<String> for CustomerTier {
    fn from(s: String) -> Self {
        CustomerTier::parse(&s)
    }
}

impl From<CustomerTier> for String {
    fn from(tier: CustomerTier) -> Self {
        tier.as_str().to_string()
    }
}

// =============================================================================
// Tax Country
// =============================================================================

/// Tax jurisdiction class of the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxCountry {
    Domestic,
    /// Foreign jurisdiction with a tax treaty and its own category table.
    #[serde(alias = "foreign_with_tax_treaty")]
    Treaty,
    Other,
}

impl TaxCountry {
    pub const ALL: [TaxCountry; 3] = [TaxCountry::Domestic, TaxCountry::Treaty, TaxCountry::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaxCountry::Domestic => "domestic",
            TaxCountry::Treaty => "treaty",
            TaxCountry::Other => "other",
        }
    }
}

impl Default for TaxCountry {
    fn default() -> Self {
        TaxCountry::Other
    }
}

impl fmt::Display for TaxCountry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxCountry {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "domestic" => Ok(TaxCountry::Domestic),
            "treaty" | "foreign_with_tax_treaty" => Ok(TaxCountry::Treaty),
            "other" => Ok(TaxCountry::Other),
            _ => Err(ValidationError::NotAllowed {
                field: "country".to_string(),
                allowed: TaxCountry::ALL.iter().map(|c| c.as_str().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Loyalty Level
// =============================================================================

/// Points needed to reach each learning-platform level.
pub const INTERMEDIATE_POINTS: u64 = 150;
pub const ADVANCED_POINTS: u64 = 300;
pub const EXPERT_POINTS: u64 = 500;

/// Level earned by accumulating loyalty points.
///
/// ## Level Ladder
/// ```text
///   0 ──────── 150 ──────────── 300 ─────────── 500 ──────────►
///    novice     │ intermediate   │   advanced     │   expert
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoyaltyLevel {
    Novice,
    Intermediate,
    Advanced,
    Expert,
}

impl LoyaltyLevel {
    /// Derives the level from a point balance.
    ///
    /// ```rust
    /// use meridian_core::types::LoyaltyLevel;
    ///
    /// assert_eq!(LoyaltyLevel::from_points(149), LoyaltyLevel::Novice);
    /// assert_eq!(LoyaltyLevel::from_points(300), LoyaltyLevel::Advanced);
    /// ```
    pub fn from_points(points: u64) -> Self {
        if points >= EXPERT_POINTS {
            LoyaltyLevel::Expert
        } else if points >= ADVANCED_POINTS {
            LoyaltyLevel::Advanced
        } else if points >= INTERMEDIATE_POINTS {
            LoyaltyLevel::Intermediate
        } else {
            LoyaltyLevel::Novice
        }
    }

    /// The customer tier that prices this level.
    pub fn tier(&self) -> CustomerTier {
        match self {
            LoyaltyLevel::Novice => CustomerTier::Novice,
            LoyaltyLevel::Intermediate => CustomerTier::Intermediate,
            LoyaltyLevel::Advanced => CustomerTier::Advanced,
            LoyaltyLevel::Expert => CustomerTier::Expert,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A single product or course entry being priced.
///
/// Fields are private: a `LineItem` built through [`LineItem::new`] is
/// always valid. Deserialized items are re-checked by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineItem {
    category: Category,
    unit_price: Money,
    quantity: i64,
}

impl LineItem {
    /// Creates a validated line item.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::Money;
    /// use meridian_core::types::{Category, LineItem};
    ///
    /// let item = LineItem::new(Category::Books, Money::from_major_minor(30, 0), 1).unwrap();
    /// assert_eq!(item.quantity(), 1);
    ///
    /// assert!(LineItem::new(Category::Books, Money::from_cents(-100), 1).is_err());
    /// assert!(LineItem::new(Category::Books, Money::from_cents(100), 0).is_err());
    /// ```
    pub fn new(category: Category, unit_price: Money, quantity: i64) -> CoreResult<Self> {
        let item = LineItem {
            category,
            unit_price,
            quantity,
        };
        item.validate()?;
        Ok(item)
    }

    /// Checks price and quantity bounds.
    pub fn validate(&self) -> CoreResult<()> {
        validate_unit_price(self.unit_price)?;
        validate_quantity(self.quantity)?;
        Ok(())
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// `unit_price × quantity`, failing on overflow.
    pub fn subtotal(&self) -> CoreResult<Money> {
        self.unit_price
            .checked_mul_quantity(self.quantity)
            .ok_or_else(|| {
                ValidationError::Overflow {
                    field: "subtotal".to_string(),
                }
                .into()
            })
    }
}

// =============================================================================
// Customer Context
// =============================================================================

/// Per-call customer facts the engine prices against.
///
/// Built by the caller from whatever store holds customer records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CustomerContext {
    pub tier: CustomerTier,
    pub country: TaxCountry,
    #[serde(default)]
    pub loyalty_points: u64,
}

impl CustomerContext {
    pub fn new(tier: CustomerTier, country: TaxCountry) -> Self {
        CustomerContext {
            tier,
            country,
            loyalty_points: 0,
        }
    }

    pub fn with_loyalty_points(mut self, points: u64) -> Self {
        self.loyalty_points = points;
        self
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// Outcome of pricing one line item.
///
/// ## Invariants
/// - `total == subtotal - discount + tax`
/// - `0 <= discount <= subtotal`
/// - `tax` was computed on `subtotal - discount`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricingResult {
    subtotal: Money,
    discount: Money,
    tax: Money,
    total: Money,
}

impl PricingResult {
    /// Builds a result from its parts, deriving the total.
    ///
    /// Fails with `Overflow` when the total leaves the money range.
    pub(crate) fn from_parts(subtotal: Money, discount: Money, tax: Money) -> CoreResult<Self> {
        let total = balance(subtotal, discount, tax).ok_or_else(|| ValidationError::Overflow {
            field: "total".to_string(),
        })?;

        Ok(PricingResult {
            subtotal,
            discount,
            tax,
            total,
        })
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    #[inline]
    pub fn discount(&self) -> Money {
        self.discount
    }

    #[inline]
    pub fn tax(&self) -> Money {
        self.tax
    }

    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    /// The amount tax was charged on.
    #[inline]
    pub fn discounted(&self) -> Money {
        self.subtotal - self.discount
    }

    /// Checks the invariants. Always true for engine output; useful for
    /// results that came back over the wire.
    pub fn is_balanced(&self) -> bool {
        !self.discount.is_negative()
            && self.discount <= self.subtotal
            && !self.tax.is_negative()
            && balance(self.subtotal, self.discount, self.tax) == Some(self.total)
    }
}

/// `subtotal - discount + tax`, or `None` on overflow.
pub(crate) fn balance(subtotal: Money, discount: Money, tax: Money) -> Option<Money> {
    subtotal.checked_sub(discount)?.checked_add(tax)
}

// =============================================================================
// Unit Tests
// =============================================================================
