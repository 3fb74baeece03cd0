//! # meridian-core: Pure Pricing Logic for Meridian
//!
//! This crate is the **heart** of Meridian. It prices line items and orders
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Meridian Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Order / Enrollment Workflows (callers)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           meridian-ledger (PricingService facade)               │   │
//! │  │     customer store, quote cache, rule book config, logging      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CustomerContext + LineItem             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ meridian-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   rules   │  │  engine   │  │   │
//! │  │   │ LineItem  │  │   Money   │  │ Discounts │  │   price   │  │   │
//! │  │   │  Context  │  │  percent  │  │   Taxes   │  │   order   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO GLOBAL STATE • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, CustomerContext, PricingResult, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`rules`] - Discount ladders and tax tables as data
//! - [`engine`] - The pricing pipeline
//! - [`order`] - Multi-line order quotes
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, bit for bit
//! 2. **No I/O**: storage, config files and logging live in meridian-ledger
//! 3. **Integer Money**: cents (i64) and basis points (u32), never floats
//! 4. **Rules Are Data**: no pricing decision is a hard-coded branch
//!
//! ## Example Usage
//!
//! ```rust
//! use meridian_core::{Category, CustomerContext, CustomerTier, LineItem, Money, PricingEngine, TaxCountry};
//!
//! let engine = PricingEngine::standard();
//! let item = LineItem::new(Category::Generic, Money::from_major_minor(100, 0), 2).unwrap();
//! let customer = CustomerContext::new(CustomerTier::Regular, TaxCountry::Other)
//!     .with_loyalty_points(1200);
//!
//! let result = engine.price(&item, &customer).unwrap();
//! assert_eq!(result.discount(), Money::from_major_minor(16, 0));
//! assert_eq!(result.total(), Money::from_major_minor(211, 60));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod money;
pub mod order;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::PricingEngine;
pub use error::{CoreResult, PricingError, ValidationError};
pub use money::Money;
pub use order::OrderQuote;
pub use rules::RuleBook;
pub use types::*;
