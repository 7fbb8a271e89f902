//! Port for disbursement record persistence.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Disbursement, DisbursementDraft, DisbursementStatus, NewDisbursement, StatusChange,
};

/// Errors raised by disbursement store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisbursementStoreError {
    /// Store connection could not be established.
    #[error("disbursement store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("disbursement store query failed: {message}")]
    Query { message: String },
}

impl DisbursementStoreError {
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

/// Port for writing and reading disbursement records.
///
/// Records are append-only; [`DisbursementStore::apply`] mutates status and
/// the terminal payload columns, nothing else. Every call is a single-row
/// operation with no cross-record transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DisbursementStore: Send + Sync {
    /// Persist a new record with status forced to `pending`.
    async fn create(&self, new: NewDisbursement) -> Result<Disbursement, DisbursementStoreError>;

    /// Apply a status transition. Returns `None` when no record has `id`.
    async fn apply(
        &self,
        id: i64,
        change: StatusChange,
    ) -> Result<Option<Disbursement>, DisbursementStoreError>;

    /// Find a record by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Disbursement>, DisbursementStoreError>;

    /// Records for a loan, newest first.
    async fn list_by_loan(&self, loan_id: i64)
    -> Result<Vec<Disbursement>, DisbursementStoreError>;

    /// Records for a customer, newest first.
    async fn list_by_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<Disbursement>, DisbursementStoreError>;
}

/// Fixture implementation for wiring paths that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDisbursementStore;

#[async_trait]
impl DisbursementStore for FixtureDisbursementStore {
    async fn create(&self, new: NewDisbursement) -> Result<Disbursement, DisbursementStoreError> {
        let now = Utc::now();
        Disbursement::new(DisbursementDraft {
            id: 0,
            loan_id: new.loan_id,
            customer_id: new.customer_id,
            amount_aud: new.amount_aud,
            method: new.method,
            status: DisbursementStatus::Pending,
            recipient_address: new.recipient_address,
            tx_hash: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| DisbursementStoreError::query(err.to_string()))
    }

    async fn apply(
        &self,
        _id: i64,
        _change: StatusChange,
    ) -> Result<Option<Disbursement>, DisbursementStoreError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Disbursement>, DisbursementStoreError> {
        Ok(None)
    }

    async fn list_by_loan(
        &self,
        _loan_id: i64,
    ) -> Result<Vec<Disbursement>, DisbursementStoreError> {
        Ok(Vec::new())
    }

    async fn list_by_customer(
        &self,
        _customer_id: i64,
    ) -> Result<Vec<Disbursement>, DisbursementStoreError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::DisbursementMethod;

    #[tokio::test]
    async fn fixture_create_returns_pending_record() {
        let store = FixtureDisbursementStore;
        let record = store
            .create(NewDisbursement {
                loan_id: 1,
                customer_id: 2,
                amount_aud: dec!(100),
                recipient_address: "0xabc".to_owned(),
                method: DisbursementMethod::OnChain,
            })
            .await
            .expect("fixture create succeeds");

        assert_eq!(record.status(), DisbursementStatus::Pending);
        assert!(record.tx_hash().is_none());
    }

    #[tokio::test]
    async fn fixture_apply_reports_missing_record() {
        let store = FixtureDisbursementStore;
        let updated = store
            .apply(7, StatusChange::Processing)
            .await
            .expect("fixture apply succeeds");
        assert!(updated.is_none());
    }

    #[test]
    fn query_error_formats_message() {
        let err = DisbursementStoreError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));
    }
}
