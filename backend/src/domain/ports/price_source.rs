//! Port for the upstream market data source.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::AssetPair;

/// Errors raised by market data source adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceSourceError {
    /// Transport-level failure reaching the source.
    #[error("market data transport failed: {message}")]
    Transport { message: String },
    /// The source did not answer within its deadline.
    #[error("market data request timed out: {message}")]
    Timeout { message: String },
    /// The source answered with an unusable payload.
    #[error("market data payload invalid: {message}")]
    Decode { message: String },
    /// The source does not serve this asset pair.
    #[error("unsupported asset pair: {pair}")]
    UnsupportedPair { pair: String },
}

impl PriceSourceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn unsupported_pair(pair: impl Into<String>) -> Self {
        Self::UnsupportedPair { pair: pair.into() }
    }
}

/// Port over a live market price feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current price for `pair`.
    async fn fetch(&self, pair: &AssetPair) -> Result<Decimal, PriceSourceError>;
}
