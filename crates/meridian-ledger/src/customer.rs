//! # Customer Records
//!
//! The store the pricing service reads customer facts from.
//!
//! ```text
//! ┌──────────────────┐   get / insert / update   ┌──────────────────────┐
//! │  PricingService  │ ────────────────────────► │ impl CustomerStore   │
//! └────────┬─────────┘                           │  (in-memory, db, ...)│
//!          │ CustomerRecord::to_context          └──────────────────────┘
//!          ▼
//!   CustomerContext ──► PricingEngine (never sees the store)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use meridian_core::validation::{validate_country_code, validate_customer_id, validate_customer_name};
use meridian_core::{CustomerContext, CustomerTier, Money};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};

// =============================================================================
// Customer Record
// =============================================================================

/// A stored customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub name: String,
    pub tier: CustomerTier,
    /// ISO 3166-1 alpha-2, upper-case.
    pub country_code: String,
    pub loyalty_points: u64,
    /// Sum of every recorded purchase total.
    pub lifetime_purchases: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerRecord {
    /// Creates a validated record with a fresh id.
    pub fn new(name: &str, tier: CustomerTier, country_code: &str) -> LedgerResult<Self> {
        validate_customer_name(name)?;
        let country_code = validate_country_code(country_code)?;
        let now = Utc::now();

        Ok(CustomerRecord {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            tier,
            country_code,
            loyalty_points: 0,
            lifetime_purchases: Money::zero(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Derives the per-call pricing context.
    pub fn to_context(&self, config: &LedgerConfig) -> CustomerContext {
        CustomerContext::new(self.tier, config.country_for(&self.country_code))
            .with_loyalty_points(self.loyalty_points)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// =============================================================================
// Customer Store
// =============================================================================

/// Storage for customer records.
///
/// Implementations own their records; the pricing engine never touches a
/// store directly.
pub trait CustomerStore {
    /// Fetches a record by id.
    fn get(&self, id: &str) -> LedgerResult<CustomerRecord>;

    /// Adds a new record. Fails if the id is taken.
    fn insert(&mut self, record: CustomerRecord) -> LedgerResult<()>;

    /// Replaces an existing record. Fails if the id is unknown.
    fn update(&mut self, record: CustomerRecord) -> LedgerResult<()>;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A `HashMap`-backed store for tests, demos and single-process callers.
#[derive(Debug, Default)]
pub struct InMemoryCustomerStore {
    records: HashMap<String, CustomerRecord>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CustomerStore for InMemoryCustomerStore {
    /// Ids that are not UUIDs can never be stored, so they are reported
    /// as not found.
    fn get(&self, id: &str) -> LedgerResult<CustomerRecord> {
        if validate_customer_id(id).is_err() {
            return Err(LedgerError::CustomerNotFound(id.to_string()));
        }
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::CustomerNotFound(id.to_string()))
    }

    fn insert(&mut self, record: CustomerRecord) -> LedgerResult<()> {
        validate_customer_id(&record.id)?;
        if self.records.contains_key(&record.id) {
            return Err(LedgerError::DuplicateCustomer(record.id));
        }
        debug!(customer_id = %record.id, tier = %record.tier, "Inserting customer");
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    fn update(&mut self, record: CustomerRecord) -> LedgerResult<()> {
        match self.records.get_mut(&record.id) {
            Some(existing) => {
                debug!(customer_id = %record.id, "Updating customer");
                *existing = record;
                Ok(())
            }
            None => Err(LedgerError::CustomerNotFound(record.id)),
        }
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::TaxCountry;

    #[test]
    fn test_new_record_is_validated() {
        let record = CustomerRecord::new("  Ana Lopez ", CustomerTier::Regular, "es").unwrap();
        assert_eq!(record.name, "Ana Lopez");
        assert_eq!(record.country_code, "ES");
        assert!(record.lifetime_purchases.is_zero());
        assert!(validate_customer_id(&record.id).is_ok());

        assert!(CustomerRecord::new("", CustomerTier::Regular, "ES").is_err());
        assert!(CustomerRecord::new("Ana", CustomerTier::Regular, "Spain").is_err());
    }

    #[test]
    fn test_to_context_resolves_country() {
        let config = LedgerConfig::default();
        let mut record = CustomerRecord::new("Ana", CustomerTier::Premium, "ES").unwrap();
        record.loyalty_points = 42;

        let ctx = record.to_context(&config);
        assert_eq!(ctx.tier, CustomerTier::Premium);
        assert_eq!(ctx.country, TaxCountry::Treaty);
        assert_eq!(ctx.loyalty_points, 42);
    }

    #[test]
    fn test_store_crud() {
        let mut store = InMemoryCustomerStore::new();
        assert!(store.is_empty());

        let mut record = CustomerRecord::new("Luis", CustomerTier::Student, "MX").unwrap();
        store.insert(record.clone()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&record.id).unwrap(), record);

        assert!(matches!(
            store.insert(record.clone()),
            Err(LedgerError::DuplicateCustomer(_))
        ));

        record.loyalty_points = 10;
        store.update(record.clone()).unwrap();
        assert_eq!(store.get(&record.id).unwrap().loyalty_points, 10);
    }

    #[test]
    fn test_store_lookup_errors() {
        let mut store = InMemoryCustomerStore::new();
        let unknown = Uuid::new_v4().to_string();

        assert!(matches!(store.get(&unknown), Err(LedgerError::CustomerNotFound(_))));

        let malformed = store.get("EST001").unwrap_err();
        assert!(matches!(malformed, LedgerError::CustomerNotFound(_)));
        assert!(!malformed.is_invalid_input());

        let record = CustomerRecord::new("Luis", CustomerTier::Regular, "MX").unwrap();
        assert!(matches!(store.update(record), Err(LedgerError::CustomerNotFound(_))));
    }
}
