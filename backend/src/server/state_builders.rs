//! Builders assembling handler state from configuration.

use std::sync::Arc;
use std::time::Duration;

use backend::domain::ports::{FixtureDisbursementStore, PayoutBackends};
use backend::domain::{
    CapitalService, DisbursementCommandService, DisbursementQueryService, LoanService, PriceCache,
    PriceQueryService,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::payout::{
    ApiPayoutBackend, OnChainPayoutBackend, OnChainSettings, PaymentApiSettings,
};
use backend::outbound::persistence::{
    DbPool, DieselCapitalStore, DieselDisbursementStore, DieselLoanStore,
};
use backend::outbound::pricing::CoinGeckoSource;
use mockable::DefaultClock;
use url::Url;

/// Everything the state builder consumes out of the server configuration.
pub(crate) struct StateParts {
    pub db_pool: Option<DbPool>,
    pub on_chain: OnChainSettings,
    pub payment_api: PaymentApiSettings,
    pub coingecko_base_url: Url,
    pub price_cache_ttl: Duration,
}

/// Assemble the HTTP state: Diesel-backed stores when a pool is configured,
/// fixtures otherwise. Payout backends and the price pipeline are always
/// real.
pub(crate) fn build_http_state(parts: StateParts) -> std::io::Result<HttpState> {
    let backends = PayoutBackends::new(
        Arc::new(OnChainPayoutBackend::new(parts.on_chain)),
        Arc::new(ApiPayoutBackend::new(parts.payment_api)),
    );

    let source = CoinGeckoSource::new(parts.coingecko_base_url)
        .map_err(|err| std::io::Error::other(format!("price client construction failed: {err}")))?;
    let cache = Arc::new(PriceCache::new(parts.price_cache_ttl, Arc::new(DefaultClock)));
    let price = Arc::new(PriceQueryService::new(cache, Arc::new(source)));

    let state = match parts.db_pool {
        Some(pool) => {
            let disbursement_store = Arc::new(DieselDisbursementStore::new(pool.clone()));
            let loans = Arc::new(LoanService::new(Arc::new(DieselLoanStore::new(pool.clone()))));
            let capital = Arc::new(CapitalService::new(Arc::new(DieselCapitalStore::new(pool))));

            HttpState {
                disbursements: Arc::new(DisbursementCommandService::new(
                    disbursement_store.clone(),
                    backends.clone(),
                )),
                disbursements_query: Arc::new(DisbursementQueryService::new(
                    disbursement_store,
                    backends,
                )),
                loans: loans.clone(),
                loans_query: loans,
                capital: capital.clone(),
                capital_query: capital,
                price,
            }
        }
        None => {
            let mut state = HttpState::fixture();
            // Balance queries and pricing need no database.
            state.disbursements_query = Arc::new(DisbursementQueryService::new(
                Arc::new(FixtureDisbursementStore),
                backends,
            ));
            state.price = price;
            state
        }
    };

    Ok(state)
}
