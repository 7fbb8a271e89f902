//! Driving port for market price reads.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{AssetPair, Error};

/// A quote as served to clients, with cache provenance flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteView {
    pub price: Decimal,
    /// Quote currency symbol (e.g. `AUD`).
    pub currency: String,
    /// Whether the quote was served from cache rather than fetched live.
    pub cached: bool,
    /// Set when the cached quote had expired but the live fetch failed.
    pub stale: bool,
}

/// Port for reading market prices.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceQuery: Send + Sync {
    /// Current quote for `pair`, served from cache when fresh.
    async fn quote(&self, pair: AssetPair) -> Result<QuoteView, Error>;
}

/// Fixture implementation reporting the feed as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePriceQuery;

#[async_trait]
impl PriceQuery for FixturePriceQuery {
    async fn quote(&self, _pair: AssetPair) -> Result<QuoteView, Error> {
        Err(Error::service_unavailable("market data unavailable"))
    }
}
