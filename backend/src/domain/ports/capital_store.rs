//! Port for capital supply and deposit address persistence.

use async_trait::async_trait;

use crate::domain::{
    CapitalSupply, CapitalSupplyFilter, CapitalToken, DepositAddress, NewCapitalSupply,
};

/// Errors raised by capital store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapitalStoreError {
    /// Store connection could not be established.
    #[error("capital store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("capital store query failed: {message}")]
    Query { message: String },
}

impl CapitalStoreError {
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

/// Port for capital supplies and the deposit addresses they flow through.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CapitalStore: Send + Sync {
    /// Persist a supply with status forced to `pending`.
    async fn create_supply(
        &self,
        new: NewCapitalSupply,
    ) -> Result<CapitalSupply, CapitalStoreError>;

    /// Supplies matching `filter`, newest first.
    async fn list_supplies(
        &self,
        filter: CapitalSupplyFilter,
    ) -> Result<Vec<CapitalSupply>, CapitalStoreError>;

    /// The newest active, unswept deposit address for `(user, token)`.
    async fn find_active_deposit_address(
        &self,
        user_id: i64,
        token: CapitalToken,
    ) -> Result<Option<DepositAddress>, CapitalStoreError>;

    /// Persist a freshly generated deposit address as active and unswept.
    async fn create_deposit_address(
        &self,
        user_id: i64,
        token: CapitalToken,
        address: String,
    ) -> Result<DepositAddress, CapitalStoreError>;

    /// All deposit addresses for a user, newest first.
    async fn list_deposit_addresses(
        &self,
        user_id: i64,
    ) -> Result<Vec<DepositAddress>, CapitalStoreError>;
}

/// Fixture implementation for wiring paths that do not exercise capital.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCapitalStore;

#[async_trait]
impl CapitalStore for FixtureCapitalStore {
    async fn create_supply(
        &self,
        new: NewCapitalSupply,
    ) -> Result<CapitalSupply, CapitalStoreError> {
        let now = chrono::Utc::now();
        Ok(CapitalSupply {
            id: 0,
            user_id: new.user_id,
            token: new.token,
            amount: new.amount,
            wallet_address: new.wallet_address,
            tx_hash: new.tx_hash,
            status: crate::domain::SupplyStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_supplies(
        &self,
        _filter: CapitalSupplyFilter,
    ) -> Result<Vec<CapitalSupply>, CapitalStoreError> {
        Ok(Vec::new())
    }

    async fn find_active_deposit_address(
        &self,
        _user_id: i64,
        _token: CapitalToken,
    ) -> Result<Option<DepositAddress>, CapitalStoreError> {
        Ok(None)
    }

    async fn create_deposit_address(
        &self,
        user_id: i64,
        token: CapitalToken,
        address: String,
    ) -> Result<DepositAddress, CapitalStoreError> {
        let now = chrono::Utc::now();
        Ok(DepositAddress {
            id: 0,
            user_id,
            token,
            address,
            active: true,
            swept: false,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_deposit_addresses(
        &self,
        _user_id: i64,
    ) -> Result<Vec<DepositAddress>, CapitalStoreError> {
        Ok(Vec::new())
    }
}
