//! CoinGecko-backed market price source.
//!
//! Transport details only: URL construction, timeout and status mapping,
//! and JSON decoding into a price. The free simple-price endpoint needs no
//! API key.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;

use crate::domain::AssetPair;
use crate::domain::ports::{PriceSource, PriceSourceError};

const SIMPLE_PRICE_PATH: &str = "/api/v3/simple/price";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// CoinGecko coin identifier for an asset symbol.
fn coin_id(symbol: &str) -> Option<&'static str> {
    match symbol {
        "BTC" => Some("bitcoin"),
        "ETH" => Some("ethereum"),
        _ => None,
    }
}

type PriceMap = HashMap<String, HashMap<String, Decimal>>;

fn extract_price(
    prices: &PriceMap,
    id: &str,
    vs: &str,
    pair: &AssetPair,
) -> Result<Decimal, PriceSourceError> {
    prices
        .get(id)
        .and_then(|currencies| currencies.get(vs))
        .copied()
        .ok_or_else(|| {
            PriceSourceError::decode(format!("price for {pair} missing from response"))
        })
}

fn map_transport_error(error: reqwest::Error) -> PriceSourceError {
    if error.is_timeout() {
        PriceSourceError::timeout(error.to_string())
    } else {
        PriceSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode) -> PriceSourceError {
    let message = format!("status {}", status.as_u16());
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PriceSourceError::timeout(message)
        }
        _ => PriceSourceError::transport(message),
    }
}

/// Market data adapter for the CoinGecko simple-price API.
pub struct CoinGeckoSource {
    client: Client,
    base_url: Url,
}

impl CoinGeckoSource {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    async fn fetch(&self, pair: &AssetPair) -> Result<Decimal, PriceSourceError> {
        let id = coin_id(pair.base())
            .ok_or_else(|| PriceSourceError::unsupported_pair(pair.to_string()))?;
        let vs = pair.quote().to_lowercase();

        let mut url = self
            .base_url
            .join(SIMPLE_PRICE_PATH)
            .map_err(|err| PriceSourceError::transport(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("ids", id)
            .append_pair("vs_currencies", &vs);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }

        let prices: PriceMap = response
            .json()
            .await
            .map_err(|err| PriceSourceError::decode(err.to_string()))?;

        extract_price(&prices, id, &vs, pair)
    }
}
