//! On-chain stablecoin payout backend.
//!
//! Holds the RPC endpoint, token contract address, and signing key the
//! transfer would use. The chain integration itself is not wired up yet:
//! `send` fabricates a transaction hash and `balance` reports a fixed
//! snapshot, matching the platform's current placeholder behaviour.

use async_trait::async_trait;
use rand::RngCore;
use rust_decimal::Decimal;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::Balance;
use crate::domain::ports::{PayoutBackend, PayoutBackendError};

/// Connection and signing settings for the on-chain backend.
pub struct OnChainSettings {
    /// JSON-RPC endpoint of the blockchain node.
    pub rpc_url: String,
    /// Address of the AUD stablecoin contract.
    pub contract_address: String,
    /// Hex-encoded signing key of the disbursement account.
    pub signing_key: Zeroizing<String>,
}

/// Payout backend releasing AUD as an on-chain stablecoin transfer.
pub struct OnChainPayoutBackend {
    settings: OnChainSettings,
}

impl OnChainPayoutBackend {
    /// Create a backend with the given settings.
    pub fn new(settings: OnChainSettings) -> Self {
        Self { settings }
    }
}

fn fabricate_tx_hash() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

#[async_trait]
impl PayoutBackend for OnChainPayoutBackend {
    async fn send(
        &self,
        amount_aud: Decimal,
        recipient: &str,
    ) -> Result<String, PayoutBackendError> {
        info!(
            %amount_aud,
            recipient,
            contract = %self.settings.contract_address,
            rpc = %self.settings.rpc_url,
            "sending on-chain disbursement"
        );

        // TODO: submit a signed transfer through the RPC endpoint once the
        // AUDC contract is deployed; settings already carry the key material.
        Ok(fabricate_tx_hash())
    }

    async fn balance(&self) -> Result<Balance, PayoutBackendError> {
        info!(
            contract = %self.settings.contract_address,
            "fetching on-chain balance"
        );

        Ok(Balance::from_tiers(Decimal::from(100_000), Decimal::ZERO))
    }
}
