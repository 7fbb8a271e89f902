//! Driving port for disbursement reads and backend balance queries.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Balance, Disbursement, DisbursementMethod, Error};

/// Port for reading disbursement records and payout account balances.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DisbursementQuery: Send + Sync {
    /// Fetch a record by id; `NotFound` when absent.
    async fn get(&self, id: i64) -> Result<Disbursement, Error>;

    /// Records for a loan, newest first.
    async fn list_by_loan(&self, loan_id: i64) -> Result<Vec<Disbursement>, Error>;

    /// Records for a customer, newest first.
    async fn list_by_customer(&self, customer_id: i64) -> Result<Vec<Disbursement>, Error>;

    /// Live balance of the payout account behind `method`.
    async fn balance(&self, method: DisbursementMethod) -> Result<Balance, Error>;
}

/// Fixture implementation for wiring paths with no records.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDisbursementQuery;

#[async_trait]
impl DisbursementQuery for FixtureDisbursementQuery {
    async fn get(&self, _id: i64) -> Result<Disbursement, Error> {
        Err(Error::not_found("Disbursement not found"))
    }

    async fn list_by_loan(&self, _loan_id: i64) -> Result<Vec<Disbursement>, Error> {
        Ok(Vec::new())
    }

    async fn list_by_customer(&self, _customer_id: i64) -> Result<Vec<Disbursement>, Error> {
        Ok(Vec::new())
    }

    async fn balance(&self, _method: DisbursementMethod) -> Result<Balance, Error> {
        Ok(Balance::from_tiers(Decimal::ZERO, Decimal::ZERO))
    }
}
