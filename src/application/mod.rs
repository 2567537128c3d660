//! Application layer containing the core simulation logic.
//!
//! The `Ledger` is the authoritative in-memory store and the only place
//! campaign balances mutate. The `ContractEngine` wraps it with the staged,
//! time-delayed transaction pipeline and the goal-completion watcher, and the
//! `StepTracker` projects engine milestones into tutorial progress.

pub mod engine;
pub mod ledger;
pub mod orchestrator;
