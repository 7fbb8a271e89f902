//! Driving ports for capital supplies and deposit addresses.

use async_trait::async_trait;

use crate::domain::{
    CapitalSupply, CapitalSupplyFilter, CapitalToken, DepositAddress, Error, NewCapitalSupply,
};

/// A deposit address handed to a supplier, flagged when freshly generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedDepositAddress {
    pub address: DepositAddress,
    pub is_new: bool,
}

/// Port for registering supplies and issuing deposit addresses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CapitalCommand: Send + Sync {
    /// Record a supply in `pending` status.
    async fn create_supply(&self, new: NewCapitalSupply) -> Result<CapitalSupply, Error>;

    /// Return the user's active deposit address for `token`, generating and
    /// persisting a fresh one when none exists.
    async fn issue_deposit_address(
        &self,
        user_id: i64,
        token: CapitalToken,
    ) -> Result<IssuedDepositAddress, Error>;
}

/// Port for listing supplies and deposit addresses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CapitalQuery: Send + Sync {
    /// Supplies matching `filter`, newest first.
    async fn list_supplies(&self, filter: CapitalSupplyFilter)
    -> Result<Vec<CapitalSupply>, Error>;

    /// All deposit addresses for a user, newest first.
    async fn list_deposit_addresses(&self, user_id: i64) -> Result<Vec<DepositAddress>, Error>;
}

/// Fixture implementation serving no capital records.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCapitalOps;

#[async_trait]
impl CapitalCommand for FixtureCapitalOps {
    async fn create_supply(&self, new: NewCapitalSupply) -> Result<CapitalSupply, Error> {
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

    async fn issue_deposit_address(
        &self,
        user_id: i64,
        token: CapitalToken,
    ) -> Result<IssuedDepositAddress, Error> {
        let now = chrono::Utc::now();
        Ok(IssuedDepositAddress {
            address: DepositAddress {
                id: 0,
                user_id,
                token,
                address: "0x0000000000000000000000000000000000000000".to_owned(),
                active: true,
                swept: false,
                created_at: now,
                updated_at: now,
            },
            is_new: true,
        })
    }
}

#[async_trait]
impl CapitalQuery for FixtureCapitalOps {
    async fn list_supplies(
        &self,
        _filter: CapitalSupplyFilter,
    ) -> Result<Vec<CapitalSupply>, Error> {
        Ok(Vec::new())
    }

    async fn list_deposit_addresses(&self, _user_id: i64) -> Result<Vec<DepositAddress>, Error> {
        Ok(Vec::new())
    }
}
