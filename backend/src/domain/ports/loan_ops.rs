//! Driving ports for loan creation and listing.

use async_trait::async_trait;

use crate::domain::{Error, Loan, LoanFilter, NewLoan};

/// Port for accepting loan applications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanCommand: Send + Sync {
    /// Create a loan in `pending` status.
    async fn create(&self, new: NewLoan) -> Result<Loan, Error>;
}

/// Port for listing loans.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanQuery: Send + Sync {
    /// Loans matching `filter`, newest first.
    async fn list(&self, filter: LoanFilter) -> Result<Vec<Loan>, Error>;
}

/// Fixture implementation serving no loans.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoanOps;

#[async_trait]
impl LoanCommand for FixtureLoanOps {
    async fn create(&self, new: NewLoan) -> Result<Loan, Error> {
        let now = chrono::Utc::now();
        Ok(Loan {
            id: 0,
            customer_id: new.customer_id,
            amount_aud: new.amount_aud,
            collateral_btc: new.collateral_btc,
            btc_price_at_creation: new.btc_price_at_creation,
            status: crate::domain::LoanStatus::Pending,
            deposit_address: None,
            derivation_path: None,
            created_at: now,
            updated_at: now,
        })
    }
}

#[async_trait]
impl LoanQuery for FixtureLoanOps {
    async fn list(&self, _filter: LoanFilter) -> Result<Vec<Loan>, Error> {
        Ok(Vec::new())
    }
}
