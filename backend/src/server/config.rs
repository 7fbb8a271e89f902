//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use backend::outbound::payout::{OnChainSettings, PaymentApiSettings};
use backend::outbound::persistence::DbPool;
use url::Url;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) on_chain: OnChainSettings,
    pub(crate) payment_api: PaymentApiSettings,
    pub(crate) coingecko_base_url: Url,
    pub(crate) price_cache_ttl: Duration,
}

impl ServerConfig {
    /// Construct a server configuration from application settings.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        on_chain: OnChainSettings,
        payment_api: PaymentApiSettings,
        coingecko_base_url: Url,
        price_cache_ttl: Duration,
    ) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            on_chain,
            payment_api,
            coingecko_base_url,
            price_cache_ttl,
        }
    }

    /// Attach a database connection pool.
    ///
    /// With a pool present the server uses Diesel-backed stores; without one
    /// it serves fixture data, which keeps local smoke runs possible.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
