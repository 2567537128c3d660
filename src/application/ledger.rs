use crate::domain::campaign::{Campaign, CampaignId, CampaignSpec};
use crate::domain::funds::{Amount, Balance};
use crate::domain::contract::ContractState;
use crate::domain::transaction::{
    CONTRACT_IDENTITY, GAS_CAMPAIGN_CREATION, GAS_DONATION, GAS_PRICE, GAS_WITHDRAWAL,
    Transaction, TransactionId, TransactionStatus, TransactionType,
};
use crate::error::{Result, SimulationError};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// The outcome of applying a confirmation timer for a pending transaction.
#[derive(Debug)]
pub enum Confirmation {
    /// The transaction is unknown or no longer pending; nothing changed.
    AlreadySettled,
    /// A staged campaign became visible and the deployment record confirmed.
    CampaignListed {
        transaction: Transaction,
        campaign: Campaign,
    },
    /// A donation was credited.
    DonationApplied {
        transaction: Transaction,
        campaign_title: String,
        raised: Balance,
        /// True exactly when this donation moved `raised` from below the goal
        /// to at or above it.
        goal_reached: bool,
    },
    /// The donation could no longer be applied (e.g. the campaign finalized
    /// while it was pending). The transaction is marked `Failed` and the
    /// ledger is untouched.
    DonationRejected {
        transaction: Transaction,
        error: SimulationError,
    },
}

/// Authoritative in-memory store of campaigns, transactions and the
/// aggregate contract state.
///
/// Collections are keyed by id and insertion-ordered (ids are allocated from
/// monotonic counters and never reused). All mutations go through the methods
/// below; conservation is asserted after each of them.
#[derive(Default)]
pub struct Ledger {
    campaigns: BTreeMap<CampaignId, Campaign>,
    /// Campaigns awaiting deployment confirmation, keyed by the pending
    /// create-campaign transaction. Not visible in `campaigns()` yet.
    staged: HashMap<TransactionId, Campaign>,
    transactions: BTreeMap<TransactionId, Transaction>,
    state: ContractState,
    next_campaign_id: u64,
    next_transaction_id: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a new campaign and records its pending deployment transaction.
    ///
    /// Validation is the caller's job; the ledger appends unconditionally.
    /// The campaign is not listed until the transaction confirms. A
    /// zero-amount donation-type transaction from the creator to the
    /// contract stands in as the deployment record.
    pub fn stage_campaign(
        &mut self,
        spec: CampaignSpec,
        goal: Amount,
    ) -> (CampaignId, TransactionId) {
        self.next_campaign_id += 1;
        let campaign_id = CampaignId(self.next_campaign_id);
        let creator = spec.creator.clone();
        let campaign = Campaign::new(campaign_id, spec, goal);

        let tx_id = self.push_transaction(
            TransactionType::Donation,
            Balance::ZERO,
            creator,
            CONTRACT_IDENTITY.to_string(),
            campaign_id,
            GAS_CAMPAIGN_CREATION,
            TransactionStatus::Pending,
        );
        self.staged.insert(tx_id, campaign);
        (campaign_id, tx_id)
    }

    /// Records a pending donation, immediately visible in the log.
    ///
    /// Fails synchronously with `NotFound` when the campaign is unknown,
    /// inactive, expired or already fully funded; no transaction row is
    /// created in that case.
    pub fn submit_donation(
        &mut self,
        campaign_id: CampaignId,
        amount: Amount,
        donor: &str,
    ) -> Result<TransactionId> {
        let campaign = self
            .campaigns
            .get(&campaign_id)
            .ok_or(SimulationError::NotFound(campaign_id))?;
        if !campaign.accepts_donations(Utc::now()) {
            return Err(SimulationError::NotFound(campaign_id));
        }

        // Donations are addressed to the campaign; only deployment records
        // and withdrawal sources carry the contract identity.
        Ok(self.push_transaction(
            TransactionType::Donation,
            amount.into(),
            donor.to_string(),
            campaign_id.to_string(),
            campaign_id,
            GAS_DONATION,
            TransactionStatus::Pending,
        ))
    }

    /// Applies the confirmation for a pending transaction, exactly once.
    ///
    /// Keyed by transaction id: replaying a confirmation for a transaction
    /// that already settled is a no-op, so re-subscribing renderers and
    /// duplicate timer fires can never double-credit a campaign.
    pub fn apply_confirmation(&mut self, tx_id: TransactionId) -> Confirmation {
        match self.transactions.get(&tx_id) {
            Some(tx) if tx.is_pending() => {}
            _ => return Confirmation::AlreadySettled,
        }

        if let Some(campaign) = self.staged.remove(&tx_id) {
            let listed = self.list_campaign(campaign);
            let transaction = self.set_status(tx_id, TransactionStatus::Confirmed);
            self.assert_conservation();
            return Confirmation::CampaignListed {
                transaction,
                campaign: listed,
            };
        }

        let (campaign_id, amount) = {
            let tx = &self.transactions[&tx_id];
            (tx.campaign_id, tx.amount)
        };
        match self.record_donation(campaign_id, amount) {
            Ok(receipt) => {
                let transaction = self.set_status(tx_id, TransactionStatus::Confirmed);
                self.state.total_transactions += 1;
                self.assert_conservation();
                Confirmation::DonationApplied {
                    transaction,
                    campaign_title: receipt.campaign_title,
                    raised: receipt.raised,
                    goal_reached: receipt.goal_reached,
                }
            }
            Err(error) => {
                let transaction = self.set_status(tx_id, TransactionStatus::Failed);
                Confirmation::DonationRejected { transaction, error }
            }
        }
    }

    /// Atomically finalizes a fully funded campaign and releases its funds to
    /// the creator as a confirmed withdrawal transaction.
    ///
    /// Returns `Ok(None)` when the campaign is unknown or already finalized;
    /// a campaign can never be finalized or withdrawn from twice.
    pub fn finalize_and_withdraw(&mut self, campaign_id: CampaignId) -> Result<Option<Transaction>> {
        let Some(campaign) = self.campaigns.get(&campaign_id) else {
            return Ok(None);
        };
        if !campaign.is_active {
            return Ok(None);
        }
        let amount = campaign.raised;
        let creator = campaign.creator.clone();

        self.record_withdrawal(campaign_id, amount)?;
        self.finalize_campaign(campaign_id);
        let tx_id = self.push_transaction(
            TransactionType::Withdrawal,
            amount,
            CONTRACT_IDENTITY.to_string(),
            creator,
            campaign_id,
            GAS_WITHDRAWAL,
            TransactionStatus::Confirmed,
        );
        self.state.total_transactions += 1;
        self.assert_conservation();
        Ok(Some(self.transactions[&tx_id].clone()))
    }

    /// Lists a confirmed campaign, making it visible to donors.
    fn list_campaign(&mut self, campaign: Campaign) -> Campaign {
        self.state.total_campaigns += 1;
        let listed = campaign.clone();
        self.campaigns.insert(campaign.id, campaign);
        listed
    }

    /// Credits a confirmed donation against an active campaign.
    fn record_donation(&mut self, campaign_id: CampaignId, amount: Balance) -> Result<DonationReceipt> {
        let campaign = self
            .campaigns
            .get_mut(&campaign_id)
            .ok_or(SimulationError::NotFound(campaign_id))?;
        if !campaign.is_active {
            return Err(SimulationError::NotFound(campaign_id));
        }

        let was_below_goal = !campaign.is_fully_funded();
        campaign.credit(amount);
        let receipt = DonationReceipt {
            campaign_title: campaign.title.clone(),
            raised: campaign.raised,
            goal_reached: was_below_goal && campaign.is_fully_funded(),
        };

        self.state.total_funds_raised += amount;
        self.state.contract_balance += amount;
        Ok(receipt)
    }

    /// Debits the contract balance for a withdrawal.
    fn record_withdrawal(&mut self, _campaign_id: CampaignId, amount: Balance) -> Result<()> {
        self.state.contract_balance = self
            .state
            .contract_balance
            .checked_sub(amount)
            .ok_or(SimulationError::InsufficientBalance {
                required: amount.value(),
                available: self.state.contract_balance.value(),
            })?;
        Ok(())
    }

    /// Deactivates a campaign. Idempotent.
    fn finalize_campaign(&mut self, campaign_id: CampaignId) {
        if let Some(campaign) = self.campaigns.get_mut(&campaign_id) {
            campaign.is_active = false;
        }
    }

    fn set_status(&mut self, tx_id: TransactionId, status: TransactionStatus) -> Transaction {
        let tx = self
            .transactions
            .get_mut(&tx_id)
            .unwrap_or_else(|| unreachable!("status change for unknown transaction {tx_id}"));
        tx.status = status;
        tx.clone()
    }

    #[allow(clippy::too_many_arguments)]
    fn push_transaction(
        &mut self,
        r#type: TransactionType,
        amount: Balance,
        from: String,
        to: String,
        campaign_id: CampaignId,
        gas_used: u64,
        status: TransactionStatus,
    ) -> TransactionId {
        self.next_transaction_id += 1;
        let id = TransactionId(self.next_transaction_id);
        self.transactions.insert(
            id,
            Transaction {
                id,
                r#type,
                amount,
                from,
                to,
                campaign_id,
                timestamp: Utc::now(),
                gas_used,
                gas_price: GAS_PRICE,
                status,
            },
        );
        id
    }

    /// Conservation invariant, checked after every mutation: the contract
    /// balance is never negative and always equals the sum of `raised` over
    /// active campaigns (finalization and withdrawal are atomic, so finalized
    /// campaigns contribute nothing).
    fn assert_conservation(&self) {
        let active_total: Decimal = self
            .campaigns
            .values()
            .filter(|c| c.is_active)
            .map(|c| c.raised.value())
            .sum();
        debug_assert!(
            self.state.contract_balance.value() >= Decimal::ZERO,
            "contract balance went negative: {}",
            self.state.contract_balance
        );
        debug_assert_eq!(
            self.state.contract_balance.value(),
            active_total,
            "contract balance diverged from active campaign totals"
        );
    }

    // Read-only projections.

    pub fn campaign(&self, id: CampaignId) -> Option<&Campaign> {
        self.campaigns.get(&id)
    }

    /// Listed campaigns in insertion order. Staged campaigns are invisible
    /// until their deployment transaction confirms.
    pub fn campaigns(&self) -> impl Iterator<Item = &Campaign> {
        self.campaigns.values()
    }

    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(&id)
    }

    /// The transaction log, newest first.
    pub fn transactions_newest_first(&self) -> Vec<Transaction> {
        self.transactions.values().rev().cloned().collect()
    }

    pub fn contract_state(&self) -> ContractState {
        self.state
    }

    pub fn has_pending_transactions(&self) -> bool {
        self.transactions.values().any(Transaction::is_pending)
    }
}

struct DonationReceipt {
    campaign_title: String,
    raised: Balance,
    goal_reached: bool,
}
