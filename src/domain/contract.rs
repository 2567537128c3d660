use crate::domain::funds::Balance;
use serde::Serialize;

/// Aggregate counters derived from all campaigns and transactions.
///
/// `contract_balance` must always equal the net sum of confirmed donation
/// amounts minus confirmed withdrawal amounts, which in turn equals the sum
/// of `raised` over active campaigns (finalization and withdrawal are
/// atomic). The ledger asserts this after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ContractState {
    pub total_campaigns: u32,
    pub total_funds_raised: Balance,
    pub total_transactions: u32,
    pub contract_balance: Balance,
}
