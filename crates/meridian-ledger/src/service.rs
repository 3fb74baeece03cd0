//! # Pricing Service
//!
//! The stateful facade callers use: resolves a customer from the store,
//! builds the pricing context, asks the engine, and memoizes the answer.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quote_item(customer_id, item)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CustomerStore::get ──► CustomerRecord::to_context                      │
//! │       │                                                                 │
//! │       ├──► QuoteCache hit? ──────────────────────────► PricingResult    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricingEngine::price ──► QuoteCache::insert ────────► PricingResult    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every write to a customer record invalidates that customer's cached
//! quotes before returning.

use tracing::{debug, info, warn};

use meridian_core::{
    CustomerContext, CustomerTier, LineItem, LoyaltyLevel, Money, OrderQuote, PricingEngine,
    PricingResult, ValidationError,
};

use crate::cache::{CacheStats, QuoteCache};
use crate::config::LedgerConfig;
use crate::customer::{CustomerRecord, CustomerStore};
use crate::error::LedgerResult;

/// Pricing engine plus customer store, cache and config.
#[derive(Debug)]
pub struct PricingService<S: CustomerStore> {
    engine: PricingEngine,
    store: S,
    cache: Option<QuoteCache>,
    config: LedgerConfig,
}

impl<S: CustomerStore> PricingService<S> {
    /// Builds the service, loading the rule book the config names.
    pub fn new(config: LedgerConfig, store: S) -> LedgerResult<Self> {
        config.validate()?;
        let engine = PricingEngine::new(config.rule_book()?)?;
        let cache = config
            .cache
            .enabled
            .then(|| QuoteCache::new(config.cache.max_entries));

        info!(
            cache_enabled = cache.is_some(),
            customers = store.len(),
            "Pricing service ready"
        );

        Ok(PricingService {
            engine,
            store,
            cache,
            config,
        })
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Cache counters, or `None` when caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(QuoteCache::stats)
    }

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    /// Creates and stores a new customer.
    pub fn register_customer(
        &mut self,
        name: &str,
        tier: CustomerTier,
        country_code: &str,
    ) -> LedgerResult<CustomerRecord> {
        let record = CustomerRecord::new(name, tier, country_code)?;
        self.store.insert(record.clone())?;
        info!(customer_id = %record.id, tier = %record.tier, country = %record.country_code, "Registered customer");
        Ok(record)
    }

    pub fn customer(&self, customer_id: &str) -> LedgerResult<CustomerRecord> {
        self.store.get(customer_id)
    }

    /// Pricing context for a stored customer.
    pub fn context_for(&self, customer_id: &str) -> LedgerResult<CustomerContext> {
        let record = self.store.get(customer_id)?;
        if !record.tier.is_recognized() {
            warn!(customer_id = %customer_id, "Customer tier is unrecognized; category defaults apply");
        }
        Ok(record.to_context(&self.config))
    }

    // -------------------------------------------------------------------------
    // Quotes
    // -------------------------------------------------------------------------

    /// Prices one line item for a stored customer.
    ///
    /// The customer is always read from the store; only the engine call is
    /// memoized.
    pub fn quote_item(&mut self, customer_id: &str, item: &LineItem) -> LedgerResult<PricingResult> {
        item.validate()?;
        let context = self.context_for(customer_id)?;

        if let Some(cache) = self.cache.as_mut() {
            if let Some(hit) = cache.get(customer_id, item) {
                debug!(customer_id = %customer_id, category = %item.category(), "Quote cache hit");
                return Ok(hit);
            }
        }

        let result = self.engine.price(item, &context)?;
        debug!(
            customer_id = %customer_id,
            category = %item.category(),
            subtotal = %result.subtotal(),
            discount = %result.discount(),
            tax = %result.tax(),
            total = %result.total(),
            "Priced line item"
        );

        if let Some(cache) = self.cache.as_mut() {
            cache.insert(customer_id, item, result);
        }

        Ok(result)
    }

    /// Prices a whole order for a stored customer. Orders are not cached.
    pub fn quote_order(&self, customer_id: &str, items: &[LineItem]) -> LedgerResult<OrderQuote> {
        let context = self.context_for(customer_id)?;
        let quote = self.engine.quote_order(items, &context)?;
        debug!(
            customer_id = %customer_id,
            lines = quote.lines.len(),
            total = %quote.total,
            "Priced order"
        );
        Ok(quote)
    }

    // -------------------------------------------------------------------------
    // Customer Updates
    // -------------------------------------------------------------------------

    /// Adds a completed purchase to the customer's lifetime total.
    ///
    /// A regular customer whose lifetime total passes the configured
    /// threshold is promoted to premium.
    pub fn record_purchase(&mut self, customer_id: &str, amount: Money) -> LedgerResult<CustomerRecord> {
        if amount.is_negative() || amount.is_zero() {
            return Err(ValidationError::MustBePositive {
                field: "amount".to_string(),
            }
            .into());
        }

        let mut record = self.store.get(customer_id)?;
        record.lifetime_purchases = record
            .lifetime_purchases
            .checked_add(amount)
            .ok_or_else(|| ValidationError::Overflow {
                field: "lifetime_purchases".to_string(),
            })?;

        if record.tier == CustomerTier::Regular && record.lifetime_purchases > self.config.promotion_threshold() {
            record.tier = CustomerTier::Premium;
            info!(
                customer_id = %customer_id,
                lifetime_purchases = %record.lifetime_purchases,
                "Promoted customer to premium"
            );
        }

        self.save(record)
    }

    /// Credits loyalty points. Learning-level customers move up a level
    /// when their balance crosses a threshold.
    pub fn award_points(&mut self, customer_id: &str, points: u64) -> LedgerResult<CustomerRecord> {
        let mut record = self.store.get(customer_id)?;
        record.loyalty_points = record
            .loyalty_points
            .checked_add(points)
            .ok_or_else(|| ValidationError::Overflow {
                field: "loyalty_points".to_string(),
            })?;

        if is_learning_level(record.tier) {
            let tier = LoyaltyLevel::from_points(record.loyalty_points).tier();
            if tier != record.tier {
                info!(customer_id = %customer_id, from = %record.tier, to = %tier, "Customer level changed");
                record.tier = tier;
            }
        }

        self.save(record)
    }

    fn save(&mut self, mut record: CustomerRecord) -> LedgerResult<CustomerRecord> {
        record.touch();
        self.store.update(record.clone())?;
        if let Some(cache) = self.cache.as_mut() {
            cache.invalidate_customer(&record.id);
        }
        Ok(record)
    }
}

fn is_learning_level(tier: CustomerTier) -> bool {
    matches!(
        tier,
        CustomerTier::Novice | CustomerTier::Intermediate | CustomerTier::Advanced | CustomerTier::Expert
    )
}
