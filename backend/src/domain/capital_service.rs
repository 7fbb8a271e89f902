//! Capital supply domain services.

use std::sync::Arc;

use async_trait::async_trait;
use rand::RngCore;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::ports::{
    CapitalCommand, CapitalQuery, CapitalStore, CapitalStoreError, IssuedDepositAddress,
};
use crate::domain::{CapitalSupply, CapitalSupplyFilter, CapitalToken, DepositAddress, Error, NewCapitalSupply};

fn map_store_error(error: CapitalStoreError) -> Error {
    match error {
        CapitalStoreError::Connection { message } => {
            Error::service_unavailable(format!("capital store unavailable: {message}"))
        }
        CapitalStoreError::Query { message } => {
            Error::internal(format!("capital store error: {message}"))
        }
    }
}

/// Generate a fresh EVM-style deposit address (20 random bytes, hex).
fn generate_deposit_address() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

/// Capital service implementing the command and query driving ports.
#[derive(Clone)]
pub struct CapitalService<S> {
    store: Arc<S>,
}

impl<S> CapitalService<S> {
    /// Create the service over a capital store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> CapitalCommand for CapitalService<S>
where
    S: CapitalStore,
{
    async fn create_supply(&self, new: NewCapitalSupply) -> Result<CapitalSupply, Error> {
        if new.amount <= Decimal::ZERO {
            return Err(Error::invalid_request("amount must be positive"));
        }
        if new.wallet_address.trim().is_empty() {
            return Err(Error::invalid_request("walletAddress must not be empty"));
        }

        let supply = self
            .store
            .create_supply(new)
            .await
            .map_err(map_store_error)?;
        info!(
            supply_id = supply.id,
            user_id = supply.user_id,
            token = %supply.token,
            "created capital supply"
        );
        Ok(supply)
    }

    async fn issue_deposit_address(
        &self,
        user_id: i64,
        token: CapitalToken,
    ) -> Result<IssuedDepositAddress, Error> {
        if let Some(existing) = self
            .store
            .find_active_deposit_address(user_id, token)
            .await
            .map_err(map_store_error)?
        {
            return Ok(IssuedDepositAddress {
                address: existing,
                is_new: false,
            });
        }

        let address = self
            .store
            .create_deposit_address(user_id, token, generate_deposit_address())
            .await
            .map_err(map_store_error)?;
        info!(
            user_id,
            token = %token,
            address = %address.address,
            "generated deposit address"
        );
        Ok(IssuedDepositAddress {
            address,
            is_new: true,
        })
    }
}

#[async_trait]
impl<S> CapitalQuery for CapitalService<S>
where
    S: CapitalStore,
{
    async fn list_supplies(
        &self,
        filter: CapitalSupplyFilter,
    ) -> Result<Vec<CapitalSupply>, Error> {
        self.store
            .list_supplies(filter)
            .await
            .map_err(map_store_error)
    }

    async fn list_deposit_addresses(&self, user_id: i64) -> Result<Vec<DepositAddress>, Error> {
        self.store
            .list_deposit_addresses(user_id)
            .await
            .map_err(map_store_error)
    }
}
