//! In-memory doubles for endpoint tests.
//!
//! The store mirrors the SQL adapter's observable semantics: sequential
//! ids, `pending` on create, newest-first listings with an id tiebreak.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use backend::domain::ports::{
    DisbursementStore, DisbursementStoreError, PayoutBackend, PayoutBackendError,
};
use backend::domain::{
    Balance, Disbursement, DisbursementDraft, DisbursementStatus, NewDisbursement, StatusChange,
};
use chrono::Utc;
use rust_decimal::Decimal;

fn to_draft(record: &Disbursement) -> DisbursementDraft {
    DisbursementDraft {
        id: record.id(),
        loan_id: record.loan_id(),
        customer_id: record.customer_id(),
        amount_aud: record.amount_aud(),
        method: record.method(),
        status: record.status(),
        recipient_address: record.recipient_address().to_owned(),
        tx_hash: record.tx_hash().map(str::to_owned),
        error_message: record.error_message().map(str::to_owned),
        created_at: record.created_at(),
        updated_at: record.updated_at(),
    }
}

/// In-memory `DisbursementStore`.
pub struct InMemoryDisbursementStore {
    next_id: AtomicI64,
    records: Mutex<Vec<Disbursement>>,
}

impl InMemoryDisbursementStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            records: Mutex::new(Vec::new()),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().expect("store lock").len()
    }
}

#[async_trait]
impl DisbursementStore for InMemoryDisbursementStore {
    async fn create(&self, new: NewDisbursement) -> Result<Disbursement, DisbursementStoreError> {
        let now = Utc::now();
        let record = Disbursement::new(DisbursementDraft {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
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
        .map_err(|err| DisbursementStoreError::query(err.to_string()))?;

        self.records.lock().expect("store lock").push(record.clone());
        Ok(record)
    }

    async fn apply(
        &self,
        id: i64,
        change: StatusChange,
    ) -> Result<Option<Disbursement>, DisbursementStoreError> {
        let mut records = self.records.lock().expect("store lock");
        let Some(position) = records.iter().position(|record| record.id() == id) else {
            return Ok(None);
        };

        let mut draft = to_draft(&records[position]);
        draft.status = change.status();
        draft.tx_hash = change.tx_hash().map(str::to_owned);
        draft.error_message = change.error_message().map(str::to_owned);
        draft.updated_at = Utc::now();

        let updated = Disbursement::new(draft)
            .map_err(|err| DisbursementStoreError::query(err.to_string()))?;
        records[position] = updated.clone();
        Ok(Some(updated))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Disbursement>, DisbursementStoreError> {
        let records = self.records.lock().expect("store lock");
        Ok(records.iter().find(|record| record.id() == id).cloned())
    }

    async fn list_by_loan(
        &self,
        loan_id: i64,
    ) -> Result<Vec<Disbursement>, DisbursementStoreError> {
        let records = self.records.lock().expect("store lock");
        let mut matching: Vec<Disbursement> = records
            .iter()
            .filter(|record| record.loan_id() == loan_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at(), b.id()).cmp(&(a.created_at(), a.id())));
        Ok(matching)
    }

    async fn list_by_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<Disbursement>, DisbursementStoreError> {
        let records = self.records.lock().expect("store lock");
        let mut matching: Vec<Disbursement> = records
            .iter()
            .filter(|record| record.customer_id() == customer_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at(), b.id()).cmp(&(a.created_at(), a.id())));
        Ok(matching)
    }
}

/// Payout backend double with a canned outcome.
pub struct StubPayoutBackend {
    outcome: Result<String, String>,
}

impl StubPayoutBackend {
    pub fn succeeding(reference: &str) -> Self {
        Self {
            outcome: Ok(reference.to_owned()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_owned()),
        }
    }
}

#[async_trait]
impl PayoutBackend for StubPayoutBackend {
    async fn send(
        &self,
        _amount_aud: Decimal,
        _recipient: &str,
    ) -> Result<String, PayoutBackendError> {
        match &self.outcome {
            Ok(reference) => Ok(reference.clone()),
            Err(message) => Err(PayoutBackendError::transport(message.clone())),
        }
    }

    async fn balance(&self) -> Result<Balance, PayoutBackendError> {
        Ok(Balance::from_tiers(Decimal::from(100_000), Decimal::ZERO))
    }
}
