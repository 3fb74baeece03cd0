//! # Quote Cache
//!
//! Memoizes line-item quotes per customer.
//!
//! The cache is an ordinary owned value: the service creates one at startup
//! and drops it at shutdown. There is no process-wide instance.
//!
//! Quotes depend on the customer's tier, country and points, so any change
//! to a customer record must call [`QuoteCache::invalidate_customer`].

use std::collections::{HashMap, VecDeque};

use meridian_core::{LineItem, PricingResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    customer_id: String,
    item: LineItem,
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Bounded FIFO cache of quotes keyed by (customer, line item).
#[derive(Debug)]
pub struct QuoteCache {
    entries: HashMap<CacheKey, PricingResult>,
    order: VecDeque<CacheKey>,
    max_entries: usize,
    hits: u64,
    misses: u64,
}

impl QuoteCache {
    pub fn new(max_entries: usize) -> Self {
        QuoteCache {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_entries: max_entries.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, customer_id: &str, item: &LineItem) -> Option<PricingResult> {
        let key = CacheKey {
            customer_id: customer_id.to_string(),
            item: *item,
        };
        match self.entries.get(&key) {
            Some(result) => {
                self.hits += 1;
                Some(*result)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, customer_id: &str, item: &LineItem, result: PricingResult) {
        let key = CacheKey {
            customer_id: customer_id.to_string(),
            item: *item,
        };
        if self.entries.insert(key.clone(), result).is_some() {
            return;
        }
        self.order.push_back(key);

        while self.entries.len() > self.max_entries {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    /// Drops every quote for one customer.
    pub fn invalidate_customer(&mut self, customer_id: &str) {
        self.entries.retain(|key, _| key.customer_id != customer_id);
        self.order.retain(|key| key.customer_id != customer_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::{Category, CustomerContext, Money, PricingEngine};

    fn quote(cents: i64) -> (LineItem, PricingResult) {
        let item = LineItem::new(Category::Generic, Money::from_cents(cents), 1).unwrap();
        let result = PricingEngine::standard()
            .price(&item, &CustomerContext::default())
            .unwrap();
        (item, result)
    }

    #[test]
    fn test_hit_and_miss() {
        let mut cache = QuoteCache::new(4);
        let (item, result) = quote(1000);

        assert!(cache.get("a", &item).is_none());
        cache.insert("a", &item, result);
        assert_eq!(cache.get("a", &item), Some(result));
        assert!(cache.get("b", &item).is_none());

        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 2,
                entries: 1
            }
        );
    }

    #[test]
    fn test_evicts_oldest() {
        let mut cache = QuoteCache::new(2);
        let (first, r1) = quote(100);
        let (second, r2) = quote(200);
        let (third, r3) = quote(300);

        cache.insert("a", &first, r1);
        cache.insert("a", &second, r2);
        cache.insert("a", &third, r3);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a", &first).is_none());
        assert!(cache.get("a", &third).is_some());
    }

    #[test]
    fn test_reinsert_does_not_grow() {
        let mut cache = QuoteCache::new(2);
        let (item, result) = quote(100);
        cache.insert("a", &item, result);
        cache.insert("a", &item, result);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.order.len(), 1);
    }

    #[test]
    fn test_invalidate_customer() {
        let mut cache = QuoteCache::new(8);
        let (item, result) = quote(100);
        cache.insert("a", &item, result);
        cache.insert("b", &item, result);

        cache.invalidate_customer("a");
        assert!(cache.get("a", &item).is_none());
        assert!(cache.get("b", &item).is_some());

        cache.clear();
        assert!(cache.is_empty());
    }
}
