//! Capital-supply aggregate: stablecoin deposits earning yield, and the
//! per-user deposit addresses they flow through.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stablecoins accepted as supplied capital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CapitalToken {
    Aaud,
    Usdc,
    Usdt,
}

impl CapitalToken {
    /// Wire representation (`AAUD` / `USDC` / `USDT`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aaud => "AAUD",
            Self::Usdc => "USDC",
            Self::Usdt => "USDT",
        }
    }

    /// All accepted tokens, for validation messages.
    pub const ALL: [Self; 3] = [Self::Aaud, Self::Usdc, Self::Usdt];
}

impl std::fmt::Display for CapitalToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing an unsupported token symbol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported token: {0}")]
pub struct ParseCapitalTokenError(pub String);

impl FromStr for CapitalToken {
    type Err = ParseCapitalTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "AAUD" => Ok(Self::Aaud),
            "USDC" => Ok(Self::Usdc),
            "USDT" => Ok(Self::Usdt),
            other => Err(ParseCapitalTokenError(other.to_owned())),
        }
    }
}

/// Lifecycle status of a capital supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyStatus {
    /// Recorded, on-chain transfer not yet confirmed.
    Pending,
    /// Transfer confirmed and earning yield.
    Confirmed,
}

impl SupplyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
        }
    }
}

/// Error raised when parsing an unknown supply status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown supply status: {0}")]
pub struct ParseSupplyStatusError(pub String);

impl FromStr for SupplyStatus {
    type Err = ParseSupplyStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            other => Err(ParseSupplyStatusError(other.to_owned())),
        }
    }
}

/// Fields captured when a supplier registers a deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCapitalSupply {
    pub user_id: i64,
    pub token: CapitalToken,
    pub amount: Decimal,
    pub wallet_address: String,
    pub tx_hash: Option<String>,
}

/// A persisted capital supply record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapitalSupply {
    pub id: i64,
    pub user_id: i64,
    pub token: CapitalToken,
    pub amount: Decimal,
    pub wallet_address: String,
    pub tx_hash: Option<String>,
    pub status: SupplyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional filters applied when listing capital supplies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapitalSupplyFilter {
    pub user_id: Option<i64>,
    pub token: Option<CapitalToken>,
    pub status: Option<SupplyStatus>,
}

/// A deposit address issued to a supplier for one token.
///
/// At most one `active`, unswept address per `(user, token)` is handed out;
/// issuing again returns the existing address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositAddress {
    pub id: i64,
    pub user_id: i64,
    pub token: CapitalToken,
    pub address: String,
    pub active: bool,
    pub swept: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
