//! Loan domain services.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::ports::{LoanCommand, LoanQuery, LoanStore, LoanStoreError};
use crate::domain::{Error, Loan, LoanFilter, NewLoan};

fn map_store_error(error: LoanStoreError) -> Error {
    match error {
        LoanStoreError::Connection { message } => {
            Error::service_unavailable(format!("loan store unavailable: {message}"))
        }
        LoanStoreError::Query { message } => {
            Error::internal(format!("loan store error: {message}"))
        }
    }
}

fn validate_new_loan(new: &NewLoan) -> Result<(), Error> {
    for (value, field) in [
        (new.amount_aud, "amountAud"),
        (new.collateral_btc, "collateralBtc"),
        (new.btc_price_at_creation, "btcPriceAtCreation"),
    ] {
        if value <= Decimal::ZERO {
            return Err(Error::invalid_request(format!("{field} must be positive")));
        }
    }
    Ok(())
}

/// Loan service implementing the command and query driving ports.
#[derive(Clone)]
pub struct LoanService<S> {
    store: Arc<S>,
}

impl<S> LoanService<S> {
    /// Create the service over a loan store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> LoanCommand for LoanService<S>
where
    S: LoanStore,
{
    async fn create(&self, new: NewLoan) -> Result<Loan, Error> {
        validate_new_loan(&new)?;
        let loan = self.store.create(new).await.map_err(map_store_error)?;
        info!(loan_id = loan.id, customer_id = loan.customer_id, "created pending loan");
        Ok(loan)
    }
}

#[async_trait]
impl<S> LoanQuery for LoanService<S>
where
    S: LoanStore,
{
    async fn list(&self, filter: LoanFilter) -> Result<Vec<Loan>, Error> {
        self.store.list(filter).await.map_err(map_store_error)
    }
}
