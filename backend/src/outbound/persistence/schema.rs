//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the SQL migrations exactly; regenerate with
//! `diesel print-schema` after a migration changes the schema.

diesel::table! {
    /// Disbursement records: one row per payout attempt, append-only.
    disbursements (id) {
        id -> Int8,
        loan_id -> Int8,
        customer_id -> Int8,
        amount_aud -> Numeric,
        /// `on_chain` or `api`.
        method -> Varchar,
        /// `pending`, `processing`, `completed`, or `failed`.
        status -> Varchar,
        recipient_address -> Varchar,
        /// Set only on completed rows.
        tx_hash -> Nullable<Varchar>,
        /// Set only on failed rows.
        error_message -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// BTC-collateralised AUD loans.
    loans (id) {
        id -> Int8,
        customer_id -> Int8,
        amount_aud -> Numeric,
        collateral_btc -> Numeric,
        btc_price_at_creation -> Numeric,
        /// `pending`, `active`, `repaid`, or `liquidated`.
        status -> Varchar,
        /// BTC deposit address derived by external HD-wallet tooling.
        deposit_address -> Nullable<Varchar>,
        /// BIP derivation path of `deposit_address`.
        derivation_path -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Stablecoin capital supplied to the platform.
    capital_supplies (id) {
        id -> Int8,
        user_id -> Int8,
        /// `AAUD`, `USDC`, or `USDT`.
        token -> Varchar,
        amount -> Numeric,
        wallet_address -> Varchar,
        tx_hash -> Nullable<Varchar>,
        /// `pending` or `confirmed`.
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Deposit addresses issued to capital suppliers.
    deposit_addresses (id) {
        id -> Int8,
        user_id -> Int8,
        token -> Varchar,
        address -> Varchar,
        active -> Bool,
        swept -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
