//! PostgreSQL persistence adapters (Diesel + diesel-async).

mod diesel_capital_store;
mod diesel_disbursement_store;
mod diesel_error_mapping;
mod diesel_loan_store;
mod models;
mod pool;
pub mod schema;

pub use diesel_capital_store::DieselCapitalStore;
pub use diesel_disbursement_store::DieselDisbursementStore;
pub use diesel_loan_store::DieselLoanStore;
pub use pool::{DbPool, PoolConfig, PoolError};
