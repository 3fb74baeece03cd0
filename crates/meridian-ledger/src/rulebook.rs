//! # Rule Book Files
//!
//! Reads and writes [`RuleBook`]s as TOML.
//!
//! ## File Format
//! ```toml
//! [discounts.electronics]
//! default = [{ over_cents = 100000, rate_bps = 500 }]
//!
//! [discounts.electronics.tiers]
//! premium = [{ over_cents = 100000, rate_bps = 1500 }, { rate_bps = 1000 }]
//!
//! [discounts.generic]
//! default = [{ points_over = 1000, rate_bps = 800 }]
//!
//! [taxes.treaty]
//! default_bps = 2100
//!
//! [taxes.treaty.categories]
//! books = 0
//! generic = 1500
//! ```
//!
//! A file replaces the built-in rules entirely. Unknown category, tier or
//! country keys are rejected rather than silently ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use meridian_core::rules::{CategoryDiscounts, CountryTaxes, DiscountTable, Ladder, Rung, TaxTable};
use meridian_core::{Category, CustomerTier, Money, Rate, RuleBook, TaxCountry};

use crate::error::{LedgerError, LedgerResult};

// =============================================================================
// File Shapes
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleBookFile {
    #[serde(default)]
    pub discounts: BTreeMap<String, CategoryFile>,
    #[serde(default)]
    pub taxes: BTreeMap<String, CountryFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryFile {
    #[serde(default)]
    pub default: Vec<RungFile>,
    #[serde(default)]
    pub tiers: BTreeMap<String, Vec<RungFile>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RungFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_over: Option<u64>,
    pub rate_bps: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_bps: Option<u32>,
    #[serde(default)]
    pub categories: BTreeMap<String, u32>,
}

// =============================================================================
// Conversions
// =============================================================================

fn parse_category(key: &str) -> LedgerResult<Category> {
    key.parse()
        .map_err(|_| LedgerError::InvalidConfig(format!("unknown category '{}'", key)))
}

fn parse_tier(key: &str) -> LedgerResult<CustomerTier> {
    match CustomerTier::parse(key) {
        CustomerTier::Unrecognized => Err(LedgerError::InvalidConfig(format!(
            "unknown customer tier '{}'",
            key
        ))),
        tier => Ok(tier),
    }
}

fn parse_country(key: &str) -> LedgerResult<TaxCountry> {
    key.parse()
        .map_err(|_| LedgerError::InvalidConfig(format!("unknown tax country '{}'", key)))
}

impl RungFile {
    fn to_rung(&self) -> Rung {
        Rung {
            over: self.over_cents.map(Money::from_cents),
            points_over: self.points_over,
            rate: Rate::from_bps(self.rate_bps),
        }
    }

    fn from_rung(rung: &Rung) -> Self {
        RungFile {
            over_cents: rung.over.map(|m| m.cents()),
            points_over: rung.points_over,
            rate_bps: rung.rate.bps(),
        }
    }
}

fn to_ladder(rungs: &[RungFile]) -> Ladder {
    Ladder::new(rungs.iter().map(RungFile::to_rung).collect())
}

fn from_ladder(ladder: &Ladder) -> Vec<RungFile> {
    ladder.rungs().iter().map(RungFile::from_rung).collect()
}

impl RuleBookFile {
    /// Converts to a validated rule book.
    pub fn into_rule_book(self) -> LedgerResult<RuleBook> {
        let mut discounts = DiscountTable::new();
        for (key, file) in &self.discounts {
            let mut table = CategoryDiscounts::new(to_ladder(&file.default));
            for (tier_key, rungs) in &file.tiers {
                table = table.tier(parse_tier(tier_key)?, to_ladder(rungs));
            }
            discounts = discounts.category(parse_category(key)?, table);
        }

        let mut taxes = TaxTable::new();
        for (key, file) in &self.taxes {
            let mut table = match file.default_bps {
                Some(bps) => CountryTaxes::with_default(Rate::from_bps(bps)),
                None => CountryTaxes::strict(),
            };
            for (category_key, bps) in &file.categories {
                table = table.category(parse_category(category_key)?, Rate::from_bps(*bps));
            }
            taxes = taxes.country(parse_country(key)?, table);
        }

        let book = RuleBook::new(discounts, taxes);
        book.validate()?;
        Ok(book)
    }

    /// Captures an in-memory rule book in file form.
    pub fn from_rule_book(book: &RuleBook) -> Self {
        let discounts = book
            .discounts
            .categories()
            .map(|(category, table)| {
                let tiers = table
                    .tiers()
                    .map(|(tier, ladder)| (tier.to_string(), from_ladder(ladder)))
                    .collect();
                let file = CategoryFile {
                    default: from_ladder(table.default_ladder()),
                    tiers,
                };
                (category.to_string(), file)
            })
            .collect();

        let taxes = book
            .taxes
            .countries()
            .map(|(country, table)| {
                let file = CountryFile {
                    default_bps: table.default_rate().map(|r| r.bps()),
                    categories: table
                        .categories()
                        .map(|(category, rate)| (category.to_string(), rate.bps()))
                        .collect(),
                };
                (country.to_string(), file)
            })
            .collect();

        RuleBookFile { discounts, taxes }
    }
}

// =============================================================================
// File I/O
// =============================================================================

/// Parses a rule book from TOML text.
pub fn parse_rule_book(contents: &str) -> LedgerResult<RuleBook> {
    let file: RuleBookFile = toml::from_str(contents)?;
    debug!(
        categories = file.discounts.len(),
        countries = file.taxes.len(),
        "Parsed rule book"
    );
    file.into_rule_book()
}

/// Loads a rule book from a TOML file.
pub fn load_rule_book(path: &Path) -> LedgerResult<RuleBook> {
    info!(?path, "Loading rule book from file");
    let contents = std::fs::read_to_string(path)?;
    parse_rule_book(&contents)
}

/// Renders a rule book as TOML.
pub fn render_rule_book(book: &RuleBook) -> LedgerResult<String> {
    Ok(toml::to_string_pretty(&RuleBookFile::from_rule_book(book))?)
}

// =============================================================================
// Unit Tests
// =============================================================================
