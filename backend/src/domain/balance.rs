//! Payout account balance snapshot.

use rust_decimal::Decimal;

/// Balance tiers reported by a payout backend's account.
///
/// Transient: fetched live on each balance query, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub available: Decimal,
    pub pending: Decimal,
    pub total: Decimal,
}

impl Balance {
    /// Build a snapshot where the total is the sum of the tiers.
    pub fn from_tiers(available: Decimal, pending: Decimal) -> Self {
        Self {
            available,
            pending,
            total: available + pending,
        }
    }
}
