//! PostgreSQL-backed `DisbursementStore` implementation using Diesel.
//!
//! Rows pass through the validated domain constructor on the way out, so a
//! row violating the terminal-payload invariant surfaces as a query error
//! instead of leaking into the domain.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DisbursementStore, DisbursementStoreError};
use crate::domain::{
    Disbursement, DisbursementDraft, DisbursementMethod, DisbursementStatus, NewDisbursement,
    StatusChange,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DisbursementRow, NewDisbursementRow};
use super::pool::{DbPool, PoolError};
use super::schema::disbursements;

/// Diesel-backed implementation of the disbursement store port.
#[derive(Clone)]
pub struct DieselDisbursementStore {
    pool: DbPool,
}

impl DieselDisbursementStore {
    /// Create a store over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> DisbursementStoreError {
    map_pool_error(error, DisbursementStoreError::connection)
}

fn map_diesel(error: diesel::result::Error) -> DisbursementStoreError {
    map_diesel_error(
        error,
        DisbursementStoreError::query,
        DisbursementStoreError::connection,
    )
}

/// Convert a database row into a validated domain record.
fn row_to_disbursement(row: DisbursementRow) -> Result<Disbursement, DisbursementStoreError> {
    let method = DisbursementMethod::from_str(&row.method)
        .map_err(|err| DisbursementStoreError::query(err.to_string()))?;
    let status = DisbursementStatus::from_str(&row.status)
        .map_err(|err| DisbursementStoreError::query(err.to_string()))?;

    Disbursement::new(DisbursementDraft {
        id: row.id,
        loan_id: row.loan_id,
        customer_id: row.customer_id,
        amount_aud: row.amount_aud,
        method,
        status,
        recipient_address: row.recipient_address,
        tx_hash: row.tx_hash,
        error_message: row.error_message,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
    .map_err(|err| DisbursementStoreError::query(err.to_string()))
}

#[async_trait]
impl DisbursementStore for DieselDisbursementStore {
    async fn create(&self, new: NewDisbursement) -> Result<Disbursement, DisbursementStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: DisbursementRow = diesel::insert_into(disbursements::table)
            .values(NewDisbursementRow {
                loan_id: new.loan_id,
                customer_id: new.customer_id,
                amount_aud: new.amount_aud,
                method: new.method.as_str(),
                status: DisbursementStatus::Pending.as_str(),
                recipient_address: &new.recipient_address,
            })
            .returning(DisbursementRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;

        row_to_disbursement(row)
    }

    async fn apply(
        &self,
        id: i64,
        change: StatusChange,
    ) -> Result<Option<Disbursement>, DisbursementStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = diesel::update(disbursements::table.find(id))
            .set((
                disbursements::status.eq(change.status().as_str()),
                disbursements::tx_hash.eq(change.tx_hash()),
                disbursements::error_message.eq(change.error_message()),
                disbursements::updated_at.eq(Utc::now()),
            ))
            .returning(DisbursementRow::as_returning())
            .get_result::<DisbursementRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_disbursement).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Disbursement>, DisbursementStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = disbursements::table
            .find(id)
            .select(DisbursementRow::as_select())
            .first::<DisbursementRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_disbursement).transpose()
    }

    async fn list_by_loan(
        &self,
        loan_id: i64,
    ) -> Result<Vec<Disbursement>, DisbursementStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<DisbursementRow> = disbursements::table
            .filter(disbursements::loan_id.eq(loan_id))
            .order((disbursements::created_at.desc(), disbursements::id.desc()))
            .select(DisbursementRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_disbursement).collect()
    }

    async fn list_by_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<Disbursement>, DisbursementStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<DisbursementRow> = disbursements::table
            .filter(disbursements::customer_id.eq(customer_id))
            .order((disbursements::created_at.desc(), disbursements::id.desc()))
            .select(DisbursementRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_disbursement).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    use super::*;

    #[fixture]
    fn completed_row() -> DisbursementRow {
        let now = Utc::now();
        DisbursementRow {
            id: 1,
            loan_id: 10,
            customer_id: 20,
            amount_aud: dec!(100),
            method: "on_chain".to_owned(),
            status: "completed".to_owned(),
            recipient_address: "0xabc".to_owned(),
            tx_hash: Some("0xfeed".to_owned()),
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn valid_row_converts(completed_row: DisbursementRow) {
        let record = row_to_disbursement(completed_row).expect("row converts");
        assert_eq!(record.status(), DisbursementStatus::Completed);
        assert_eq!(record.tx_hash(), Some("0xfeed"));
    }

    #[rstest]
    fn unknown_method_is_a_query_error(mut completed_row: DisbursementRow) {
        completed_row.method = "wire".to_owned();
        let error = row_to_disbursement(completed_row).expect_err("must fail");
        assert!(matches!(error, DisbursementStoreError::Query { .. }));
        assert!(error.to_string().contains("unknown disbursement method"));
    }

    #[rstest]
    fn row_violating_terminal_invariant_is_rejected(mut completed_row: DisbursementRow) {
        completed_row.error_message = Some("should not be here".to_owned());
        let error = row_to_disbursement(completed_row).expect_err("must fail");
        assert!(matches!(error, DisbursementStoreError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let error = map_pool(PoolError::checkout("connection refused"));
        assert!(matches!(error, DisbursementStoreError::Connection { .. }));
        assert!(error.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let error = map_diesel(diesel::result::Error::NotFound);
        assert!(matches!(error, DisbursementStoreError::Query { .. }));
        assert!(error.to_string().contains("record not found"));
    }
}
