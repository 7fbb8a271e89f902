//! PostgreSQL-backed `CapitalStore` implementation using Diesel.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CapitalStore, CapitalStoreError};
use crate::domain::{
    CapitalSupply, CapitalSupplyFilter, CapitalToken, DepositAddress, NewCapitalSupply,
    SupplyStatus,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    CapitalSupplyRow, DepositAddressRow, NewCapitalSupplyRow, NewDepositAddressRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{capital_supplies, deposit_addresses};

/// Diesel-backed implementation of the capital store port.
#[derive(Clone)]
pub struct DieselCapitalStore {
    pool: DbPool,
}

impl DieselCapitalStore {
    /// Create a store over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> CapitalStoreError {
    map_pool_error(error, CapitalStoreError::connection)
}

fn map_diesel(error: diesel::result::Error) -> CapitalStoreError {
    map_diesel_error(error, CapitalStoreError::query, CapitalStoreError::connection)
}

fn row_to_supply(row: CapitalSupplyRow) -> Result<CapitalSupply, CapitalStoreError> {
    let token = CapitalToken::from_str(&row.token)
        .map_err(|err| CapitalStoreError::query(err.to_string()))?;
    let status = SupplyStatus::from_str(&row.status)
        .map_err(|err| CapitalStoreError::query(err.to_string()))?;

    Ok(CapitalSupply {
        id: row.id,
        user_id: row.user_id,
        token,
        amount: row.amount,
        wallet_address: row.wallet_address,
        tx_hash: row.tx_hash,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_deposit_address(row: DepositAddressRow) -> Result<DepositAddress, CapitalStoreError> {
    let token = CapitalToken::from_str(&row.token)
        .map_err(|err| CapitalStoreError::query(err.to_string()))?;

    Ok(DepositAddress {
        id: row.id,
        user_id: row.user_id,
        token,
        address: row.address,
        active: row.active,
        swept: row.swept,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl CapitalStore for DieselCapitalStore {
    async fn create_supply(
        &self,
        new: NewCapitalSupply,
    ) -> Result<CapitalSupply, CapitalStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: CapitalSupplyRow = diesel::insert_into(capital_supplies::table)
            .values(NewCapitalSupplyRow {
                user_id: new.user_id,
                token: new.token.as_str(),
                amount: new.amount,
                wallet_address: &new.wallet_address,
                tx_hash: new.tx_hash.as_deref(),
                status: SupplyStatus::Pending.as_str(),
            })
            .returning(CapitalSupplyRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        row_to_supply(row)
    }

    async fn list_supplies(
        &self,
        filter: CapitalSupplyFilter,
    ) -> Result<Vec<CapitalSupply>, CapitalStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let mut query = capital_supplies::table
            .select(CapitalSupplyRow::as_select())
            .order((capital_supplies::created_at.desc(), capital_supplies::id.desc()))
            .into_boxed();
        if let Some(user_id) = filter.user_id {
            query = query.filter(capital_supplies::user_id.eq(user_id));
        }
        if let Some(token) = filter.token {
            query = query.filter(capital_supplies::token.eq(token.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(capital_supplies::status.eq(status.as_str()));
        }

        let rows: Vec<CapitalSupplyRow> = query.load(&mut conn).await.map_err(map_diesel)?;

        rows.into_iter().map(row_to_supply).collect()
    }

    async fn find_active_deposit_address(
        &self,
        user_id: i64,
        token: CapitalToken,
    ) -> Result<Option<DepositAddress>, CapitalStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = deposit_addresses::table
            .filter(
                deposit_addresses::user_id
                    .eq(user_id)
                    .and(deposit_addresses::token.eq(token.as_str()))
                    .and(deposit_addresses::active.eq(true))
                    .and(deposit_addresses::swept.eq(false)),
            )
            .order(deposit_addresses::created_at.desc())
            .select(DepositAddressRow::as_select())
            .first::<DepositAddressRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_deposit_address).transpose()
    }

    async fn create_deposit_address(
        &self,
        user_id: i64,
        token: CapitalToken,
        address: String,
    ) -> Result<DepositAddress, CapitalStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: DepositAddressRow = diesel::insert_into(deposit_addresses::table)
            .values(NewDepositAddressRow {
                user_id,
                token: token.as_str(),
                address: &address,
                active: true,
                swept: false,
            })
            .returning(DepositAddressRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        row_to_deposit_address(row)
    }

    async fn list_deposit_addresses(
        &self,
        user_id: i64,
    ) -> Result<Vec<DepositAddress>, CapitalStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<DepositAddressRow> = deposit_addresses::table
            .filter(deposit_addresses::user_id.eq(user_id))
            .order(deposit_addresses::created_at.desc())
            .select(DepositAddressRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_deposit_address).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    #[rstest]
    fn unknown_token_is_a_query_error() {
        let now = Utc::now();
        let row = CapitalSupplyRow {
            id: 1,
            user_id: 2,
            token: "DOGE".to_owned(),
            amount: dec!(100),
            wallet_address: "0xabc".to_owned(),
            tx_hash: None,
            status: "pending".to_owned(),
            created_at: now,
            updated_at: now,
        };

        let error = row_to_supply(row).expect_err("must fail");
        assert!(matches!(error, CapitalStoreError::Query { .. }));
        assert!(error.to_string().contains("unsupported token"));
    }
}
