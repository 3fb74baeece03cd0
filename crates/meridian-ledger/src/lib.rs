//! # meridian-ledger: Customer Records and the Pricing Facade
//!
//! Everything around the pure pricing engine: configuration, rule book
//! files, the customer store, the quote cache and the service that ties
//! them together.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Meridian Pricing Flow                            │
//! │                                                                         │
//! │  Caller (checkout, enrollment, quote-demo)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  meridian-ledger (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌────────────────┐   │   │
//! │  │   │ LedgerConfig  │   │ CustomerStore │   │  QuoteCache    │   │   │
//! │  │   │ (config.rs)   │   │ (customer.rs) │   │  (cache.rs)    │   │   │
//! │  │   │ rulebook.rs   │   │               │   │                │   │   │
//! │  │   └───────┬───────┘   └───────┬───────┘   └───────┬────────┘   │   │
//! │  │           └──────────► PricingService ◄───────────┘            │   │
//! │  └──────────────────────────────┬──────────────────────────────────┘   │
//! │                                 ▼                                       │
//! │                   meridian-core::PricingEngine (pure)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use meridian_core::{Category, CustomerTier, LineItem, Money};
//! use meridian_ledger::{InMemoryCustomerStore, LedgerConfig, PricingService};
//!
//! let mut service = PricingService::new(LedgerConfig::default(), InMemoryCustomerStore::new()).unwrap();
//! let ana = service.register_customer("Ana", CustomerTier::Premium, "ES").unwrap();
//!
//! let laptop = LineItem::new(Category::Electronics, Money::from_major_minor(1500, 0), 1).unwrap();
//! let quote = service.quote_item(&ana.id, &laptop).unwrap();
//! assert_eq!(quote.total(), Money::from_major_minor(1542, 75));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod config;
pub mod customer;
pub mod error;
pub mod rulebook;
pub mod service;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cache::{CacheStats, QuoteCache};
pub use config::LedgerConfig;
pub use customer::{CustomerRecord, CustomerStore, InMemoryCustomerStore};
pub use error::{LedgerError, LedgerResult};
pub use rulebook::{load_rule_book, parse_rule_book, render_rule_book};
pub use service::PricingService;
