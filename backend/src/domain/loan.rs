//! Loan aggregate: a BTC-collateralised AUD facility.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Created, collateral deposit not yet observed.
    Pending,
    /// Collateralised and drawn down.
    Active,
    /// Fully repaid; collateral released.
    Repaid,
    /// Collateral sold to cover the outstanding balance.
    Liquidated,
}

impl LoanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Repaid => "repaid",
            Self::Liquidated => "liquidated",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing an unknown loan status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown loan status: {0}")]
pub struct ParseLoanStatusError(pub String);

impl FromStr for LoanStatus {
    type Err = ParseLoanStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "repaid" => Ok(Self::Repaid),
            "liquidated" => Ok(Self::Liquidated),
            other => Err(ParseLoanStatusError(other.to_owned())),
        }
    }
}

/// Fields captured when a loan application is accepted. Loans start in
/// `pending` until the collateral deposit is observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    pub customer_id: i64,
    pub amount_aud: Decimal,
    pub collateral_btc: Decimal,
    pub btc_price_at_creation: Decimal,
}

/// A persisted loan record.
///
/// `deposit_address` and `derivation_path` are populated by the HD-wallet
/// tooling outside this service and served verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub id: i64,
    pub customer_id: i64,
    pub amount_aud: Decimal,
    pub collateral_btc: Decimal,
    pub btc_price_at_creation: Decimal,
    pub status: LoanStatus,
    pub deposit_address: Option<String>,
    pub derivation_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional filters applied when listing loans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoanFilter {
    pub customer_id: Option<i64>,
    pub status: Option<LoanStatus>,
}
