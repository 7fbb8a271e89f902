//! PostgreSQL-backed `LoanStore` implementation using Diesel.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LoanStore, LoanStoreError};
use crate::domain::{Loan, LoanFilter, LoanStatus, NewLoan};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LoanRow, NewLoanRow};
use super::pool::{DbPool, PoolError};
use super::schema::loans;

/// Diesel-backed implementation of the loan store port.
#[derive(Clone)]
pub struct DieselLoanStore {
    pool: DbPool,
}

impl DieselLoanStore {
    /// Create a store over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> LoanStoreError {
    map_pool_error(error, LoanStoreError::connection)
}

fn map_diesel(error: diesel::result::Error) -> LoanStoreError {
    map_diesel_error(error, LoanStoreError::query, LoanStoreError::connection)
}

fn row_to_loan(row: LoanRow) -> Result<Loan, LoanStoreError> {
    let status = LoanStatus::from_str(&row.status)
        .map_err(|err| LoanStoreError::query(err.to_string()))?;

    Ok(Loan {
        id: row.id,
        customer_id: row.customer_id,
        amount_aud: row.amount_aud,
        collateral_btc: row.collateral_btc,
        btc_price_at_creation: row.btc_price_at_creation,
        status,
        deposit_address: row.deposit_address,
        derivation_path: row.derivation_path,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl LoanStore for DieselLoanStore {
    async fn create(&self, new: NewLoan) -> Result<Loan, LoanStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: LoanRow = diesel::insert_into(loans::table)
            .values(NewLoanRow {
                customer_id: new.customer_id,
                amount_aud: new.amount_aud,
                collateral_btc: new.collateral_btc,
                btc_price_at_creation: new.btc_price_at_creation,
                status: LoanStatus::Pending.as_str(),
            })
            .returning(LoanRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        row_to_loan(row)
    }

    async fn list(&self, filter: LoanFilter) -> Result<Vec<Loan>, LoanStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let mut query = loans::table
            .select(LoanRow::as_select())
            .order((loans::created_at.desc(), loans::id.desc()))
            .into_boxed();
        if let Some(customer_id) = filter.customer_id {
            query = query.filter(loans::customer_id.eq(customer_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(loans::status.eq(status.as_str()));
        }

        let rows: Vec<LoanRow> = query.load(&mut conn).await.map_err(map_diesel)?;

        rows.into_iter().map(row_to_loan).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    fn row(status: &str) -> LoanRow {
        let now = Utc::now();
        LoanRow {
            id: 1,
            customer_id: 7,
            amount_aud: dec!(50000),
            collateral_btc: dec!(1.5),
            btc_price_at_creation: dec!(150000),
            status: status.to_owned(),
            deposit_address: None,
            derivation_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn known_status_converts() {
        let loan = row_to_loan(row("active")).expect("row converts");
        assert_eq!(loan.status, LoanStatus::Active);
    }

    #[rstest]
    fn unknown_status_is_a_query_error() {
        let error = row_to_loan(row("defaulted")).expect_err("must fail");
        assert!(matches!(error, LoanStoreError::Query { .. }));
    }
}
