//! # Ledger Configuration
//!
//! Configuration management for the pricing service.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MERIDIAN_RULES_PATH=/etc/meridian/rules.toml                       │
//! │     MERIDIAN_CACHE_ENABLED=false                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     path passed by the caller, or MERIDIAN_CONFIG                      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     built-in rule book, cache on, ES → treaty, MX → domestic           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! rules_path = "rules.toml"
//! promotion_threshold_cents = 100000
//!
//! [cache]
//! enabled = true
//! max_entries = 1024
//!
//! [regions]
//! ES = "treaty"
//! MX = "domestic"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use meridian_core::validation::validate_country_code;
use meridian_core::{Money, RuleBook, TaxCountry};

use crate::error::{LedgerError, LedgerResult};
use crate::rulebook::load_rule_book;

// =============================================================================
// Pricing Settings
// =============================================================================

/// Rule book source and customer promotion policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// TOML rule book replacing the built-in tables.
    #[serde(default)]
    pub rules_path: Option<PathBuf>,

    /// Lifetime purchases above this promote a regular customer to premium.
    #[serde(default = "default_promotion_threshold")]
    pub promotion_threshold_cents: i64,
}

fn default_promotion_threshold() -> i64 {
    100_000
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            rules_path: None,
            promotion_threshold_cents: default_promotion_threshold(),
        }
    }
}

// =============================================================================
// Cache Settings
// =============================================================================

/// Quote cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Oldest entries are evicted beyond this size.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_entries() -> usize {
    1024
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            enabled: true,
            max_entries: default_max_entries(),
        }
    }
}

// =============================================================================
// Main Ledger Configuration
// =============================================================================

fn default_regions() -> BTreeMap<String, TaxCountry> {
    BTreeMap::from([
        ("ES".to_string(), TaxCountry::Treaty),
        ("MX".to_string(), TaxCountry::Domestic),
    ])
}

/// Complete ledger configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    /// ISO country code → tax country class. Unlisted codes are `other`.
    #[serde(default = "default_regions")]
    pub regions: BTreeMap<String, TaxCountry>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            pricing: PricingSettings::default(),
            cache: CacheSettings::default(),
            regions: default_regions(),
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else `MERIDIAN_CONFIG`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> LedgerResult<Self> {
        let mut config = Self::default();

        let path = config_path.or_else(|| std::env::var("MERIDIAN_CONFIG").ok().map(PathBuf::from));
        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading ledger config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load ledger config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.pricing.promotion_threshold_cents < 0 {
            return Err(LedgerError::InvalidConfig(
                "promotion_threshold_cents must not be negative".into(),
            ));
        }

        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(LedgerError::InvalidConfig(
                "cache.max_entries must be greater than 0".into(),
            ));
        }

        for code in self.regions.keys() {
            let normalized = validate_country_code(code)?;
            if &normalized != code {
                return Err(LedgerError::InvalidConfig(format!(
                    "region code '{}' must be upper-case",
                    code
                )));
            }
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("MERIDIAN_RULES_PATH") {
            debug!(path = %path, "Overriding rules path from environment");
            self.pricing.rules_path = Some(PathBuf::from(path));
        }

        if let Ok(enabled) = std::env::var("MERIDIAN_CACHE_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.cache.enabled = true,
                "0" | "false" | "no" => self.cache.enabled = false,
                _ => warn!(value = %enabled, "Unknown MERIDIAN_CACHE_ENABLED value"),
            }
        }

        if let Ok(max) = std::env::var("MERIDIAN_CACHE_MAX_ENTRIES") {
            match max.parse::<usize>() {
                Ok(n) => self.cache.max_entries = n,
                Err(_) => warn!(value = %max, "Unknown MERIDIAN_CACHE_MAX_ENTRIES value"),
            }
        }
    }

    /// Builds the rule book this config points at.
    pub fn rule_book(&self) -> LedgerResult<RuleBook> {
        match &self.pricing.rules_path {
            Some(path) => load_rule_book(path),
            None => Ok(RuleBook::standard()),
        }
    }

    /// Tax country class for an ISO country code.
    pub fn country_for(&self, country_code: &str) -> TaxCountry {
        self.regions
            .get(&country_code.to_ascii_uppercase())
            .copied()
            .unwrap_or(TaxCountry::Other)
    }

    pub fn promotion_threshold(&self) -> Money {
        Money::from_cents(self.pricing.promotion_threshold_cents)
    }
}
