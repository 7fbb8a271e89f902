//! Market price service: cache-first reads with a stale-on-error fallback.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{PriceQuery, PriceSource, PriceSourceError, QuoteView};
use crate::domain::{AssetPair, Error, PriceCache};

fn map_source_error(error: PriceSourceError) -> Error {
    match error {
        PriceSourceError::UnsupportedPair { pair } => {
            Error::invalid_request(format!("unsupported asset pair: {pair}"))
        }
        other => Error::service_unavailable(format!("market data unavailable: {other}")),
    }
}

/// Price service implementing the price query port.
///
/// Reads hit the cache first; on expiry the upstream source is consulted and
/// the cache refreshed. When the source errors and a stale quote exists, the
/// stale quote is served flagged rather than failing the request.
#[derive(Clone)]
pub struct PriceQueryService<S> {
    cache: Arc<PriceCache>,
    source: Arc<S>,
}

impl<S> PriceQueryService<S> {
    /// Create the service over a quote cache and a market data source.
    pub fn new(cache: Arc<PriceCache>, source: Arc<S>) -> Self {
        Self { cache, source }
    }
}

#[async_trait]
impl<S> PriceQuery for PriceQueryService<S>
where
    S: PriceSource,
{
    async fn quote(&self, pair: AssetPair) -> Result<QuoteView, Error> {
        if let Some(hit) = self.cache.fresh(&pair) {
            return Ok(QuoteView {
                price: hit.price,
                currency: pair.quote().to_owned(),
                cached: true,
                stale: false,
            });
        }

        match self.source.fetch(&pair).await {
            Ok(price) => {
                info!(pair = %pair, %price, "fetched market price");
                self.cache.store(pair.clone(), price);
                Ok(QuoteView {
                    price,
                    currency: pair.quote().to_owned(),
                    cached: false,
                    stale: false,
                })
            }
            Err(error) => {
                if let Some(stale) = self.cache.any(&pair) {
                    warn!(pair = %pair, error = %error, "market fetch failed, serving stale quote");
                    return Ok(QuoteView {
                        price: stale.price,
                        currency: pair.quote().to_owned(),
                        cached: true,
                        stale: true,
                    });
                }
                Err(map_source_error(error))
            }
        }
    }
}
