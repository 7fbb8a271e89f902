//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Row-to-domain conversion goes through validated constructors in
//! the store adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::{capital_supplies, deposit_addresses, disbursements, loans};

/// Row struct for reading from the disbursements table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = disbursements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DisbursementRow {
    pub id: i64,
    pub loan_id: i64,
    pub customer_id: i64,
    pub amount_aud: Decimal,
    pub method: String,
    pub status: String,
    pub recipient_address: String,
    pub tx_hash: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating disbursement records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = disbursements)]
pub(crate) struct NewDisbursementRow<'a> {
    pub loan_id: i64,
    pub customer_id: i64,
    pub amount_aud: Decimal,
    pub method: &'a str,
    pub status: &'a str,
    pub recipient_address: &'a str,
}

/// Row struct for reading from the loans table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoanRow {
    pub id: i64,
    pub customer_id: i64,
    pub amount_aud: Decimal,
    pub collateral_btc: Decimal,
    pub btc_price_at_creation: Decimal,
    pub status: String,
    pub deposit_address: Option<String>,
    pub derivation_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating loan records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = loans)]
pub(crate) struct NewLoanRow<'a> {
    pub customer_id: i64,
    pub amount_aud: Decimal,
    pub collateral_btc: Decimal,
    pub btc_price_at_creation: Decimal,
    pub status: &'a str,
}

/// Row struct for reading from the capital_supplies table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = capital_supplies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CapitalSupplyRow {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub amount: Decimal,
    pub wallet_address: String,
    pub tx_hash: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating capital supply records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = capital_supplies)]
pub(crate) struct NewCapitalSupplyRow<'a> {
    pub user_id: i64,
    pub token: &'a str,
    pub amount: Decimal,
    pub wallet_address: &'a str,
    pub tx_hash: Option<&'a str>,
    pub status: &'a str,
}

/// Row struct for reading from the deposit_addresses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = deposit_addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DepositAddressRow {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub address: String,
    pub active: bool,
    pub swept: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating deposit address records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deposit_addresses)]
pub(crate) struct NewDepositAddressRow<'a> {
    pub user_id: i64,
    pub token: &'a str,
    pub address: &'a str,
    pub active: bool,
    pub swept: bool,
}
