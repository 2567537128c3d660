use crate::domain::campaign::CampaignId;
use crate::domain::funds::Balance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identity token held by the simulated contract itself.
pub const CONTRACT_IDENTITY: &str = "contract";

// Cosmetic gas figures mirroring typical mainnet costs. No invariant depends
// on them.
pub const GAS_CAMPAIGN_CREATION: u64 = 150_000;
pub const GAS_DONATION: u64 = 75_000;
pub const GAS_WITHDRAWAL: u64 = 45_000;
pub const GAS_PRICE: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Donation,
    Withdrawal,
    Refund,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

/// A record of a single fund movement or contract interaction.
///
/// Created in `Pending` state at command time. Exactly one status transition
/// occurs afterwards: `Pending -> Confirmed` on the normal path, or
/// `Pending -> Failed` when applying the confirmation hits an internal
/// rejection. Confirmation is terminal; everything except the status field is
/// immutable from creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub r#type: TransactionType,
    pub amount: Balance,
    pub from: String,
    pub to: String,
    pub campaign_id: CampaignId,
    pub timestamp: DateTime<Utc>,
    pub gas_used: u64,
    pub gas_price: u64,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }
}
