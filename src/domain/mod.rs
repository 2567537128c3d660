//! Domain entities and value objects for the crowdfunding simulation.
//!
//! Everything here is plain data plus the small mutations the ledger is
//! allowed to perform. Scheduling, events and presentation live elsewhere.

pub mod campaign;
pub mod contract;
pub mod funds;
pub mod step;
pub mod transaction;
