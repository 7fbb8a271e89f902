//! Domain ports and supporting types for the hexagonal boundary.

mod capital_ops;
mod capital_store;
mod disbursement_command;
mod disbursement_query;
mod disbursement_store;
mod loan_ops;
mod loan_store;
mod payout_backend;
mod price_query;
mod price_source;

#[cfg(test)]
pub use capital_ops::{MockCapitalCommand, MockCapitalQuery};
pub use capital_ops::{CapitalCommand, CapitalQuery, FixtureCapitalOps, IssuedDepositAddress};
#[cfg(test)]
pub use capital_store::MockCapitalStore;
pub use capital_store::{CapitalStore, CapitalStoreError, FixtureCapitalStore};
#[cfg(test)]
pub use disbursement_command::MockDisbursementCommand;
pub use disbursement_command::{
    DisbursementCommand, FixtureDisbursementCommand, ProcessDisbursementOutcome,
    ProcessDisbursementRequest,
};
#[cfg(test)]
pub use disbursement_query::MockDisbursementQuery;
pub use disbursement_query::{DisbursementQuery, FixtureDisbursementQuery};
#[cfg(test)]
pub use disbursement_store::MockDisbursementStore;
pub use disbursement_store::{DisbursementStore, DisbursementStoreError, FixtureDisbursementStore};
#[cfg(test)]
pub use loan_ops::{MockLoanCommand, MockLoanQuery};
pub use loan_ops::{FixtureLoanOps, LoanCommand, LoanQuery};
#[cfg(test)]
pub use loan_store::MockLoanStore;
pub use loan_store::{FixtureLoanStore, LoanStore, LoanStoreError};
#[cfg(test)]
pub use payout_backend::MockPayoutBackend;
pub use payout_backend::{
    FixturePayoutBackend, PayoutBackend, PayoutBackendError, PayoutBackends,
};
#[cfg(test)]
pub use price_query::MockPriceQuery;
pub use price_query::{FixturePriceQuery, PriceQuery, QuoteView};
#[cfg(test)]
pub use price_source::MockPriceSource;
pub use price_source::{PriceSource, PriceSourceError};
