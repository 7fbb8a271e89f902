//! Market data adapters.

mod coingecko;

pub use coingecko::CoinGeckoSource;
