//! Port for payout backends and method-based backend selection.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Balance, DisbursementMethod};

/// Errors raised by payout backend adapters.
///
/// Each variant's display is the bare cause: the orchestrator records it
/// verbatim as the failed disbursement's `error_message`, so no category
/// prefix is added.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayoutBackendError {
    /// Transport-level failure reaching the backend.
    #[error("{message}")]
    Transport { message: String },
    /// The backend did not answer within its deadline.
    #[error("{message}")]
    Timeout { message: String },
    /// The backend answered and refused the operation.
    #[error("{message}")]
    Rejected { message: String },
    /// The backend is missing configuration it needs to operate.
    #[error("{message}")]
    Configuration { message: String },
}

impl PayoutBackendError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Port over a channel capable of releasing AUD to a recipient.
///
/// `send` returns the backend's reference for the transfer: a transaction
/// hash on-chain, a payment reference for API providers. Balance sufficiency
/// is not checked here; the on-chain token contract enforces it downstream
/// while the API path defers entirely to the provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PayoutBackend: Send + Sync {
    /// Release `amount_aud` to `recipient` and return the transfer reference.
    async fn send(&self, amount_aud: Decimal, recipient: &str)
    -> Result<String, PayoutBackendError>;

    /// Live balance snapshot of the backend's funding account.
    async fn balance(&self) -> Result<Balance, PayoutBackendError>;
}

/// The configured payout backends, dispatched by [`DisbursementMethod`].
///
/// This is the single place a method value selects an implementation.
#[derive(Clone)]
pub struct PayoutBackends {
    on_chain: Arc<dyn PayoutBackend>,
    api: Arc<dyn PayoutBackend>,
}

impl PayoutBackends {
    pub fn new(on_chain: Arc<dyn PayoutBackend>, api: Arc<dyn PayoutBackend>) -> Self {
        Self { on_chain, api }
    }

    /// The backend serving `method`.
    pub fn select(&self, method: DisbursementMethod) -> &Arc<dyn PayoutBackend> {
        match method {
            DisbursementMethod::OnChain => &self.on_chain,
            DisbursementMethod::Api => &self.api,
        }
    }
}

/// Fixture backend for wiring paths that never send.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePayoutBackend;

#[async_trait]
impl PayoutBackend for FixturePayoutBackend {
    async fn send(
        &self,
        _amount_aud: Decimal,
        _recipient: &str,
    ) -> Result<String, PayoutBackendError> {
        Ok("0xfixture".to_owned())
    }

    async fn balance(&self) -> Result<Balance, PayoutBackendError> {
        Ok(Balance::from_tiers(Decimal::ZERO, Decimal::ZERO))
    }
}
