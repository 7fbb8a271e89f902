//! Market price cache.
//!
//! An explicit cache component keyed by asset pair, parameterised over a
//! clock so expiry is testable, with a stale-read path the price service
//! uses as a fallback when the upstream market data source errors.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use mockable::Clock;
use rust_decimal::Decimal;

/// A base/quote currency pair, normalised to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetPair {
    base: String,
    quote: String,
}

impl AssetPair {
    /// Build a pair, normalising both symbols to uppercase.
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }

    /// The platform's collateral pricing pair.
    pub fn btc_aud() -> Self {
        Self::new("BTC", "AUD")
    }

    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    pub fn quote(&self) -> &str {
        self.quote.as_str()
    }
}

impl std::fmt::Display for AssetPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// A market quote with the instant it was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    pub price: Decimal,
    pub fetched_at: DateTime<Utc>,
}

/// In-memory quote cache keyed by asset pair.
///
/// Reads distinguish fresh entries (within the TTL) from stale ones so the
/// caller can decide whether a stale quote is an acceptable fallback.
pub struct PriceCache {
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<AssetPair, PriceQuote>>,
}

impl PriceCache {
    /// Create a cache with the given entry lifetime.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached quote for `pair` if it is still within the TTL.
    pub fn fresh(&self, pair: &AssetPair) -> Option<PriceQuote> {
        let now = self.clock.utc();
        self.lock_entries()
            .get(pair)
            .copied()
            .filter(|quote| now - quote.fetched_at <= self.ttl)
    }

    /// Return the cached quote for `pair` regardless of age.
    pub fn any(&self, pair: &AssetPair) -> Option<PriceQuote> {
        self.lock_entries().get(pair).copied()
    }

    /// Record a freshly fetched price for `pair`.
    pub fn store(&self, pair: AssetPair, price: Decimal) -> PriceQuote {
        let quote = PriceQuote {
            price,
            fetched_at: self.clock.utc(),
        };
        self.lock_entries().insert(pair, quote);
        quote
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<AssetPair, PriceQuote>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
