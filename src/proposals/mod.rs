//! Withdrawal proposals and weighted voting.
//!
//! - One proposal type: withdraw an amount from the proposer's balance
//! - Voting window of 1..=30 whole days, evaluated against the clock at call time
//! - Approval is a strict majority of cast weight (`yes > no`)
//! - Only the proposer may execute, exactly once

pub mod command;
pub mod proposal;
pub mod registry;

#[cfg(test)]
mod proptests;

pub use command::parse_duration_days;
pub use proposal::{
    Ballot, ExecutionReceipt, Proposal, ProposalStatus, ProposalView, ReleaseReceipt, VoteSide,
};
pub use registry::{ProposalRegistry, MAX_DURATION_DAYS, MIN_DURATION_DAYS};
