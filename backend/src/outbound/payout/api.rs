//! Payment-API payout backend.
//!
//! Holds the provider's base URL, API key, and source account id. The
//! provider integration is not wired up yet: `send` fabricates a payment
//! reference and `balance` reports a fixed snapshot, matching the platform's
//! current placeholder behaviour.

use async_trait::async_trait;
use rand::RngCore;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::Balance;
use crate::domain::ports::{PayoutBackend, PayoutBackendError};

/// Credentials and account settings for the payment-API backend.
pub struct PaymentApiSettings {
    /// Base URL of the payments provider.
    pub base_url: String,
    /// Bearer token for the provider.
    pub api_key: String,
    /// Source account funds are drawn from.
    pub account_id: String,
}

/// Payout backend releasing AUD through a third-party payments provider.
pub struct ApiPayoutBackend {
    settings: PaymentApiSettings,
}

impl ApiPayoutBackend {
    /// Create a backend with the given settings.
    pub fn new(settings: PaymentApiSettings) -> Self {
        Self { settings }
    }
}

fn fabricate_reference() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("PAY-{}", hex::encode_upper(bytes))
}

#[async_trait]
impl PayoutBackend for ApiPayoutBackend {
    async fn send(
        &self,
        amount_aud: Decimal,
        recipient: &str,
    ) -> Result<String, PayoutBackendError> {
        info!(
            %amount_aud,
            recipient,
            provider = %self.settings.base_url,
            "sending disbursement via payment API"
        );

        // TODO: POST /payments against base_url with the bearer key once the
        // provider account is provisioned.
        Ok(fabricate_reference())
    }

    async fn balance(&self) -> Result<Balance, PayoutBackendError> {
        info!(
            account = %self.settings.account_id,
            "fetching payment API balance"
        );

        Ok(Balance::from_tiers(
            Decimal::from(250_000),
            Decimal::from(5_000),
        ))
    }
}
