use crate::application::ledger::{Confirmation, Ledger};
use crate::application::orchestrator::StepTracker;
use crate::domain::campaign::{Campaign, CampaignId, CampaignSpec};
use crate::domain::contract::ContractState;
use crate::domain::funds::{Amount, Balance};
use crate::domain::step::{Milestone, SimulationStep};
use crate::domain::transaction::{Transaction, TransactionId};
use crate::error::{Result, SimulationError};
use crate::infrastructure::scheduler;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};

/// Fixed simulated latencies.
///
/// These are both the delays the scheduler actually applies and the values
/// advertised to the renderer, so displayed animations can never outlast or
/// undershoot the real state transition.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Time between submitting a command and its ledger effect.
    pub confirmation_delay: Duration,
    /// Grace period between a goal being reached and the automatic
    /// finalization plus withdrawal, so the notification can be observed.
    pub finalization_grace: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            confirmation_delay: Duration::from_secs(4),
            finalization_grace: Duration::from_secs(3),
        }
    }
}

/// Fire-and-forget notifications for renderers.
///
/// Never required for correctness; sending to zero subscribers is fine.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    TransactionConfirmed { transaction: Transaction },
    GoalReached {
        campaign_id: CampaignId,
        campaign_title: String,
        raised: Balance,
    },
}

/// The donate command payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationRequest {
    pub campaign_id: CampaignId,
    pub amount: Decimal,
    pub donor: String,
}

struct EngineState {
    ledger: Ledger,
    steps: StepTracker,
    /// Campaigns that crossed their goal and are waiting out the grace
    /// period. Keeps `is_idle` honest and prevents duplicate scheduling.
    finalizing: HashSet<CampaignId>,
}

/// The staged transaction pipeline around the ledger.
///
/// `ContractEngine` is cheap to clone and process-wide: pending transactions
/// always complete regardless of any subscriber teardown. All mutations
/// happen under a single write lock, so no caller ever observes a
/// half-applied ledger mutation, and confirmations arriving out of
/// submission order stay isolated per campaign and per transaction.
#[derive(Clone)]
pub struct ContractEngine {
    state: Arc<RwLock<EngineState>>,
    events: broadcast::Sender<EngineEvent>,
    config: SimulationConfig,
}

impl Default for ContractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractEngine {
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state: Arc::new(RwLock::new(EngineState {
                ledger: Ledger::new(),
                steps: StepTracker::new(),
                finalizing: HashSet::new(),
            })),
            events,
            config,
        }
    }

    /// The latencies this engine runs with, for renderers timing animations.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Submits a create-campaign command.
    ///
    /// Returns immediately with the id of the pending deployment transaction;
    /// the campaign becomes listed once it confirms. Rejects bad input
    /// synchronously with the ledger untouched.
    pub async fn create_campaign(&self, spec: CampaignSpec) -> Result<TransactionId> {
        if spec.title.trim().is_empty() {
            return Err(SimulationError::ValidationError(
                "campaign title must not be empty".to_string(),
            ));
        }
        let goal = Amount::new(spec.goal)?;
        if spec.deadline <= Utc::now() {
            return Err(SimulationError::ValidationError(
                "campaign deadline must be in the future".to_string(),
            ));
        }

        let (campaign_id, tx_id) = {
            let mut state = self.state.write().await;
            state.ledger.stage_campaign(spec, goal)
        };
        tracing::info!(%campaign_id, tx = %tx_id, "campaign staged, awaiting confirmation");
        self.schedule_confirmation(tx_id);
        Ok(tx_id)
    }

    /// Submits a donation command.
    ///
    /// The pending transaction is immediately visible in the log; the credit
    /// applies after the confirmation delay. Fails synchronously when the
    /// campaign does not accept donations or the amount is not positive.
    pub async fn donate(&self, request: DonationRequest) -> Result<TransactionId> {
        let amount = Amount::new(request.amount)?;
        let tx_id = {
            let mut state = self.state.write().await;
            state
                .ledger
                .submit_donation(request.campaign_id, amount, &request.donor)?
        };
        tracing::info!(
            campaign = %request.campaign_id,
            tx = %tx_id,
            %amount,
            "donation pending"
        );
        self.schedule_confirmation(tx_id);
        Ok(tx_id)
    }

    fn schedule_confirmation(&self, tx_id: TransactionId) {
        let engine = self.clone();
        let _ = scheduler::schedule(self.config.confirmation_delay, async move {
            engine.confirm(tx_id).await;
        });
    }

    fn schedule_finalization(&self, campaign_id: CampaignId) {
        let engine = self.clone();
        let _ = scheduler::schedule(self.config.finalization_grace, async move {
            engine.finalize(campaign_id).await;
        });
    }

    /// The confirmation timer callback. Applies the ledger mutation exactly
    /// once, updates step progress and runs the goal-completion watcher.
    async fn confirm(&self, tx_id: TransactionId) {
        let mut state = self.state.write().await;
        match state.ledger.apply_confirmation(tx_id) {
            Confirmation::AlreadySettled => {}
            Confirmation::CampaignListed {
                transaction,
                campaign,
            } => {
                state.steps.complete(
                    Milestone::CampaignCreated,
                    format!("Campaign \"{}\" created successfully!", campaign.title),
                );
                tracing::info!(campaign = %campaign.id, tx = %transaction.id, "campaign listed");
                let _ = self.events.send(EngineEvent::TransactionConfirmed { transaction });
            }
            Confirmation::DonationApplied {
                transaction,
                campaign_title,
                raised,
                goal_reached,
            } => {
                state.steps.complete(
                    Milestone::DonationConfirmed,
                    format!("Donation of {} ETH processed successfully!", transaction.amount),
                );
                let campaign_id = transaction.campaign_id;
                tracing::info!(
                    campaign = %campaign_id,
                    tx = %transaction.id,
                    %raised,
                    "donation confirmed"
                );
                let _ = self.events.send(EngineEvent::TransactionConfirmed { transaction });

                if goal_reached && state.finalizing.insert(campaign_id) {
                    tracing::info!(campaign = %campaign_id, %raised, "funding goal reached");
                    let _ = self.events.send(EngineEvent::GoalReached {
                        campaign_id,
                        campaign_title,
                        raised,
                    });
                    self.schedule_finalization(campaign_id);
                }
            }
            Confirmation::DonationRejected { transaction, error } => {
                tracing::warn!(tx = %transaction.id, %error, "donation confirmation rejected");
            }
        }
    }

    /// The grace timer callback: finalize the campaign and release its funds
    /// to the creator in one atomic step.
    async fn finalize(&self, campaign_id: CampaignId) {
        let mut state = self.state.write().await;
        let outcome = state.ledger.finalize_and_withdraw(campaign_id);
        state.finalizing.remove(&campaign_id);
        match outcome {
            Ok(Some(transaction)) => {
                state.steps.complete(
                    Milestone::AutomaticWithdrawal,
                    format!("Automatic withdrawal of {} ETH completed!", transaction.amount),
                );
                tracing::info!(
                    campaign = %campaign_id,
                    amount = %transaction.amount,
                    to = %transaction.to,
                    "automatic withdrawal executed"
                );
                let _ = self.events.send(EngineEvent::TransactionConfirmed { transaction });
            }
            Ok(None) => {}
            Err(error) => {
                // Unreachable on the happy path; the ledger was left untouched.
                tracing::error!(campaign = %campaign_id, %error, "automatic withdrawal failed");
            }
        }
    }

    // Read-only projections for the renderer.

    /// Listed campaigns in insertion order.
    pub async fn campaigns(&self) -> Vec<Campaign> {
        self.state.read().await.ledger.campaigns().cloned().collect()
    }

    /// The transaction log, newest first.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.state.read().await.ledger.transactions_newest_first()
    }

    pub async fn contract_state(&self) -> ContractState {
        self.state.read().await.ledger.contract_state()
    }

    pub async fn steps(&self) -> Vec<SimulationStep> {
        self.state.read().await.steps.steps().to_vec()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// True when no transaction is pending and no finalization is waiting out
    /// its grace period.
    pub async fn is_idle(&self) -> bool {
        let state = self.state.read().await;
        !state.ledger.has_pending_transactions() && state.finalizing.is_empty()
    }
}
