//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data`, depending only on
//! domain ports so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CapitalCommand, CapitalQuery, DisbursementCommand, DisbursementQuery, FixtureCapitalOps,
    FixtureDisbursementCommand, FixtureDisbursementQuery, FixtureLoanOps, FixturePriceQuery,
    LoanCommand, LoanQuery, PriceQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub disbursements: Arc<dyn DisbursementCommand>,
    pub disbursements_query: Arc<dyn DisbursementQuery>,
    pub loans: Arc<dyn LoanCommand>,
    pub loans_query: Arc<dyn LoanQuery>,
    pub capital: Arc<dyn CapitalCommand>,
    pub capital_query: Arc<dyn CapitalQuery>,
    pub price: Arc<dyn PriceQuery>,
}

impl HttpState {
    /// State wired entirely to fixtures, for tests that exercise routing and
    /// serialisation rather than behaviour.
    pub fn fixture() -> Self {
        Self {
            disbursements: Arc::new(FixtureDisbursementCommand),
            disbursements_query: Arc::new(FixtureDisbursementQuery),
            loans: Arc::new(FixtureLoanOps),
            loans_query: Arc::new(FixtureLoanOps),
            capital: Arc::new(FixtureCapitalOps),
            capital_query: Arc::new(FixtureCapitalOps),
            price: Arc::new(FixturePriceQuery),
        }
    }
}
