//! Disbursement aggregate: payout method, lifecycle status, and the record
//! itself.
//!
//! A disbursement is a single payout attempt releasing loan funds to a
//! borrower. Records are append-only: the orchestrator creates them in
//! `pending` and drives them through `processing` into exactly one of the
//! terminal states. `tx_hash` and `error_message` are mutually exclusive and
//! only ever set in `completed` and `failed` respectively; [`StatusChange`]
//! makes the illegal combinations unrepresentable at the write path and
//! [`Disbursement::new`] re-checks them at the read path.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payout channel used to release funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisbursementMethod {
    /// Stablecoin transfer on a blockchain network.
    OnChain,
    /// Third-party payments provider (bank transfer, PayPal, ...).
    Api,
}

impl DisbursementMethod {
    /// Wire representation (`on_chain` / `api`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnChain => "on_chain",
            Self::Api => "api",
        }
    }
}

impl std::fmt::Display for DisbursementMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing an unknown disbursement method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown disbursement method: {0}")]
pub struct ParseDisbursementMethodError(pub String);

impl FromStr for DisbursementMethod {
    type Err = ParseDisbursementMethodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "on_chain" => Ok(Self::OnChain),
            "api" => Ok(Self::Api),
            other => Err(ParseDisbursementMethodError(other.to_owned())),
        }
    }
}

/// Lifecycle status of a disbursement record.
///
/// `pending` and the two terminal states are stable; `processing` is
/// transient within a single request's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisbursementStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl DisbursementStatus {
    /// Wire representation (lowercase).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for DisbursementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing an unknown disbursement status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown disbursement status: {0}")]
pub struct ParseDisbursementStatusError(pub String);

impl FromStr for DisbursementStatus {
    type Err = ParseDisbursementStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(ParseDisbursementStatusError(other.to_owned())),
        }
    }
}

/// A status transition applied by the orchestrator.
///
/// Terminal transitions carry their payload, so a completed record cannot be
/// written without a transaction hash and a failed record cannot be written
/// without its error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Processing,
    Completed { tx_hash: String },
    Failed { error_message: String },
}

impl StatusChange {
    /// The status this transition lands on.
    pub fn status(&self) -> DisbursementStatus {
        match self {
            Self::Processing => DisbursementStatus::Processing,
            Self::Completed { .. } => DisbursementStatus::Completed,
            Self::Failed { .. } => DisbursementStatus::Failed,
        }
    }

    /// Transaction hash written by this transition, if any.
    pub fn tx_hash(&self) -> Option<&str> {
        match self {
            Self::Completed { tx_hash } => Some(tx_hash.as_str()),
            _ => None,
        }
    }

    /// Error message written by this transition, if any.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { error_message } => Some(error_message.as_str()),
            _ => None,
        }
    }
}

/// Fields captured when a disbursement record is created. The store forces
/// the initial status to `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDisbursement {
    pub loan_id: i64,
    pub customer_id: i64,
    pub amount_aud: Decimal,
    pub recipient_address: String,
    pub method: DisbursementMethod,
}

/// Unvalidated field bundle used to rebuild a [`Disbursement`] from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisbursementDraft {
    pub id: i64,
    pub loan_id: i64,
    pub customer_id: i64,
    pub amount_aud: Decimal,
    pub method: DisbursementMethod,
    pub status: DisbursementStatus,
    pub recipient_address: String,
    pub tx_hash: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validation errors raised by [`Disbursement::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisbursementValidationError {
    #[error("amount_aud must be positive")]
    NonPositiveAmount,
    #[error("recipient_address must not be empty")]
    EmptyRecipient,
    #[error("tx_hash is only valid on completed disbursements")]
    TxHashOutsideCompleted,
    #[error("completed disbursements must carry a tx_hash")]
    MissingTxHash,
    #[error("error_message is only valid on failed disbursements")]
    ErrorMessageOutsideFailed,
    #[error("failed disbursements must carry an error_message")]
    MissingErrorMessage,
}

/// A persisted disbursement record tied to a loan and customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disbursement {
    id: i64,
    loan_id: i64,
    customer_id: i64,
    amount_aud: Decimal,
    method: DisbursementMethod,
    status: DisbursementStatus,
    recipient_address: String,
    tx_hash: Option<String>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Disbursement {
    /// Validate a draft into a domain record.
    ///
    /// # Errors
    ///
    /// Returns a [`DisbursementValidationError`] when the amount is not
    /// positive, the recipient is blank, or the terminal-state payload rules
    /// are violated (`tx_hash` iff completed, `error_message` iff failed).
    pub fn new(draft: DisbursementDraft) -> Result<Self, DisbursementValidationError> {
        if draft.amount_aud <= Decimal::ZERO {
            return Err(DisbursementValidationError::NonPositiveAmount);
        }
        if draft.recipient_address.trim().is_empty() {
            return Err(DisbursementValidationError::EmptyRecipient);
        }
        match draft.status {
            DisbursementStatus::Completed => {
                if draft.tx_hash.is_none() {
                    return Err(DisbursementValidationError::MissingTxHash);
                }
                if draft.error_message.is_some() {
                    return Err(DisbursementValidationError::ErrorMessageOutsideFailed);
                }
            }
            DisbursementStatus::Failed => {
                if draft.error_message.is_none() {
                    return Err(DisbursementValidationError::MissingErrorMessage);
                }
                if draft.tx_hash.is_some() {
                    return Err(DisbursementValidationError::TxHashOutsideCompleted);
                }
            }
            DisbursementStatus::Pending | DisbursementStatus::Processing => {
                if draft.tx_hash.is_some() {
                    return Err(DisbursementValidationError::TxHashOutsideCompleted);
                }
                if draft.error_message.is_some() {
                    return Err(DisbursementValidationError::ErrorMessageOutsideFailed);
                }
            }
        }

        let DisbursementDraft {
            id,
            loan_id,
            customer_id,
            amount_aud,
            method,
            status,
            recipient_address,
            tx_hash,
            error_message,
            created_at,
            updated_at,
        } = draft;

        Ok(Self {
            id,
            loan_id,
            customer_id,
            amount_aud,
            method,
            status,
            recipient_address,
            tx_hash,
            error_message,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn loan_id(&self) -> i64 {
        self.loan_id
    }

    pub fn customer_id(&self) -> i64 {
        self.customer_id
    }

    pub fn amount_aud(&self) -> Decimal {
        self.amount_aud
    }

    pub fn method(&self) -> DisbursementMethod {
        self.method
    }

    pub fn status(&self) -> DisbursementStatus {
        self.status
    }

    pub fn recipient_address(&self) -> &str {
        self.recipient_address.as_str()
    }

    pub fn tx_hash(&self) -> Option<&str> {
        self.tx_hash.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
