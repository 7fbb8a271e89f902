//! Driving port for creating and processing disbursements.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::{
    Disbursement, DisbursementDraft, DisbursementMethod, DisbursementStatus, Error,
};

/// Request to create and immediately process a disbursement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDisbursementRequest {
    pub loan_id: i64,
    pub customer_id: i64,
    pub amount_aud: Decimal,
    pub recipient_address: String,
    pub method: DisbursementMethod,
}

/// The persisted record after the orchestrator ran to a terminal state.
///
/// A payout failure is not an error at this boundary: it is a successfully
/// recorded failed disbursement, returned with the backend's cause in
/// `failure` so the HTTP adapter can shape the 500 envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDisbursementOutcome {
    pub disbursement: Disbursement,
    pub failure: Option<String>,
}

impl ProcessDisbursementOutcome {
    /// Whether the payout landed.
    pub fn is_completed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Port for the disbursement orchestrator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DisbursementCommand: Send + Sync {
    /// Create a record and drive it `pending -> processing -> terminal`.
    async fn process(
        &self,
        request: ProcessDisbursementRequest,
    ) -> Result<ProcessDisbursementOutcome, Error>;
}

/// Fixture implementation that completes every request without sending.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDisbursementCommand;

#[async_trait]
impl DisbursementCommand for FixtureDisbursementCommand {
    async fn process(
        &self,
        request: ProcessDisbursementRequest,
    ) -> Result<ProcessDisbursementOutcome, Error> {
        let now = Utc::now();
        let disbursement = Disbursement::new(DisbursementDraft {
            id: 0,
            loan_id: request.loan_id,
            customer_id: request.customer_id,
            amount_aud: request.amount_aud,
            method: request.method,
            status: DisbursementStatus::Completed,
            recipient_address: request.recipient_address,
            tx_hash: Some("0xfixture".to_owned()),
            error_message: None,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        Ok(ProcessDisbursementOutcome {
            disbursement,
            failure: None,
        })
    }
}
