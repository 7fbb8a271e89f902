//! Port for loan persistence.

use async_trait::async_trait;

use crate::domain::{Loan, LoanFilter, NewLoan};

/// Errors raised by loan store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoanStoreError {
    /// Store connection could not be established.
    #[error("loan store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("loan store query failed: {message}")]
    Query { message: String },
}

impl LoanStoreError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for writing and listing loans.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// Persist a loan with status forced to `pending`.
    async fn create(&self, new: NewLoan) -> Result<Loan, LoanStoreError>;

    /// Loans matching `filter`, newest first.
    async fn list(&self, filter: LoanFilter) -> Result<Vec<Loan>, LoanStoreError>;
}

/// Fixture implementation for wiring paths that do not exercise loans.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoanStore;

#[async_trait]
impl LoanStore for FixtureLoanStore {
    async fn create(&self, new: NewLoan) -> Result<Loan, LoanStoreError> {
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

    async fn list(&self, _filter: LoanFilter) -> Result<Vec<Loan>, LoanStoreError> {
        Ok(Vec::new())
    }
}
