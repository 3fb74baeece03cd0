//! # Quote Demo
//!
//! Registers a few customers and prints their quotes as JSON.
//!
//! ## Usage
//! ```bash
//! # Built-in rules
//! cargo run -p meridian-ledger --bin quote-demo
//!
//! # Custom config file
//! cargo run -p meridian-ledger --bin quote-demo -- --config ./ledger.toml
//!
//! # Print the active rule book as TOML and exit
//! cargo run -p meridian-ledger --bin quote-demo -- --dump-rules
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::env;
use std::path::PathBuf;

use meridian_core::{Category, CustomerTier, LineItem, Money};
use meridian_ledger::{render_rule_book, InMemoryCustomerStore, LedgerConfig, PricingService};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// (name, tier, country code)
const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Ana Lopez", "premium", "ES"),
    ("Luis Perez", "regular", "MX"),
    ("Kim Park", "novice", "KR"),
    ("Sam Reed", "student", "US"),
];

/// (category, price in cents, quantity)
const BASKET: &[(Category, i64, i64)] = &[
    (Category::Electronics, 150_000, 1),
    (Category::Books, 3_000, 2),
    (Category::Clothing, 15_000, 1),
    (Category::Generic, 20_000, 1),
];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut dump_rules = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--dump-rules" => dump_rules = true,
            "--help" | "-h" => {
                println!("Usage: quote-demo [--config PATH] [--dump-rules]");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let config = LedgerConfig::load_or_default(config_path);
    if dump_rules {
        print!("{}", render_rule_book(&config.rule_book()?)?);
        return Ok(());
    }

    let mut service = PricingService::new(config, InMemoryCustomerStore::new())?;

    let basket = BASKET
        .iter()
        .map(|&(category, cents, qty)| LineItem::new(category, Money::from_cents(cents), qty))
        .collect::<Result<Vec<_>, _>>()?;

    for &(name, tier, country) in CUSTOMERS {
        let customer = service.register_customer(name, CustomerTier::parse(tier), country)?;
        let quote = service.quote_order(&customer.id, &basket)?;

        info!(customer = name, total = %quote.total, "Quoted basket");
        println!("{}", serde_json::to_string_pretty(&quote)?);

        service.record_purchase(&customer.id, quote.total)?;
    }

    Ok(())
}
