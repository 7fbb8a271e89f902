//! Disbursement orchestration services.
//!
//! The command service owns the record lifecycle: it creates the record in
//! `pending`, marks it `processing`, invokes the payout backend selected by
//! the request's method, and lands the record in `completed` or `failed`.
//! Whatever the payout does, the caller receives the final persisted record.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::ports::{
    DisbursementCommand, DisbursementQuery, DisbursementStore, DisbursementStoreError,
    PayoutBackends, ProcessDisbursementOutcome, ProcessDisbursementRequest,
};
use crate::domain::{
    Balance, Disbursement, DisbursementMethod, Error, NewDisbursement, StatusChange,
};

fn map_store_error(error: DisbursementStoreError) -> Error {
    match error {
        DisbursementStoreError::Connection { message } => {
            Error::service_unavailable(format!("disbursement store unavailable: {message}"))
        }
        DisbursementStoreError::Query { message } => {
            Error::internal(format!("disbursement store error: {message}"))
        }
    }
}

/// Orchestrator implementing the disbursement command port.
///
/// No idempotency key and no per-loan mutual exclusion: a duplicate request
/// creates a second, independent record, and balance sufficiency is left to
/// the backend layer.
#[derive(Clone)]
pub struct DisbursementCommandService<S> {
    store: Arc<S>,
    backends: PayoutBackends,
}

impl<S> DisbursementCommandService<S> {
    /// Create the orchestrator over a record store and the payout backends.
    pub fn new(store: Arc<S>, backends: PayoutBackends) -> Self {
        Self { store, backends }
    }
}

impl<S> DisbursementCommandService<S>
where
    S: DisbursementStore,
{
    async fn apply_transition(&self, id: i64, change: StatusChange) -> Result<Disbursement, Error> {
        self.store
            .apply(id, change)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::internal(format!("disbursement {id} vanished mid-transition")))
    }
}

fn validate_request(request: &ProcessDisbursementRequest) -> Result<(), Error> {
    if request.amount_aud <= Decimal::ZERO {
        return Err(Error::invalid_request("amountAud must be positive"));
    }
    if request.recipient_address.trim().is_empty() {
        return Err(Error::invalid_request("recipientAddress must not be empty"));
    }
    Ok(())
}

#[async_trait]
impl<S> DisbursementCommand for DisbursementCommandService<S>
where
    S: DisbursementStore,
{
    async fn process(
        &self,
        request: ProcessDisbursementRequest,
    ) -> Result<ProcessDisbursementOutcome, Error> {
        validate_request(&request)?;

        let created = self
            .store
            .create(NewDisbursement {
                loan_id: request.loan_id,
                customer_id: request.customer_id,
                amount_aud: request.amount_aud,
                recipient_address: request.recipient_address.clone(),
                method: request.method,
            })
            .await
            .map_err(map_store_error)?;
        let id = created.id();

        self.apply_transition(id, StatusChange::Processing).await?;

        let sent = self
            .backends
            .select(request.method)
            .send(request.amount_aud, &request.recipient_address)
            .await;

        match sent {
            Ok(tx_hash) => {
                info!(
                    disbursement_id = id,
                    loan_id = request.loan_id,
                    method = %request.method,
                    "disbursement completed"
                );
                let disbursement = self
                    .apply_transition(id, StatusChange::Completed { tx_hash })
                    .await?;
                Ok(ProcessDisbursementOutcome {
                    disbursement,
                    failure: None,
                })
            }
            Err(cause) => {
                let message = cause.to_string();
                warn!(
                    disbursement_id = id,
                    loan_id = request.loan_id,
                    method = %request.method,
                    error = %message,
                    "disbursement failed"
                );
                let disbursement = self
                    .apply_transition(
                        id,
                        StatusChange::Failed {
                            error_message: message.clone(),
                        },
                    )
                    .await?;
                Ok(ProcessDisbursementOutcome {
                    disbursement,
                    failure: Some(message),
                })
            }
        }
    }
}

/// Read side implementing the disbursement query port.
#[derive(Clone)]
pub struct DisbursementQueryService<S> {
    store: Arc<S>,
    backends: PayoutBackends,
}

impl<S> DisbursementQueryService<S> {
    /// Create the query service over a record store and the payout backends.
    pub fn new(store: Arc<S>, backends: PayoutBackends) -> Self {
        Self { store, backends }
    }
}

#[async_trait]
impl<S> DisbursementQuery for DisbursementQueryService<S>
where
    S: DisbursementStore,
{
    async fn get(&self, id: i64) -> Result<Disbursement, Error> {
        self.store
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found("Disbursement not found"))
    }

    async fn list_by_loan(&self, loan_id: i64) -> Result<Vec<Disbursement>, Error> {
        self.store
            .list_by_loan(loan_id)
            .await
            .map_err(map_store_error)
    }

    async fn list_by_customer(&self, customer_id: i64) -> Result<Vec<Disbursement>, Error> {
        self.store
            .list_by_customer(customer_id)
            .await
            .map_err(map_store_error)
    }

    async fn balance(&self, method: DisbursementMethod) -> Result<Balance, Error> {
        self.backends
            .select(method)
            .balance()
            .await
            .map_err(|err| Error::service_unavailable(format!("balance query failed: {err}")))
    }
}

#[cfg(test)]
#[path = "disbursement_service_tests.rs"]
mod tests;
