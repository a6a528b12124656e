//! Proposal registry: the withdrawal state machine.
//!
//! The registry owns every proposal ever created and enforces the
//! transitions:
//!
//! ```text
//! propose ──► Open ──(now >= expires_at)──► Closed ──execute──► Executed
//!              │ vote                        │ release (idempotent)
//! ```
//!
//! It holds no clock and no balances. Callers pass the current time and the
//! pool's [`Ledger`], which keeps the registry testable on its own. Every
//! operation validates fully before mutating, so a returned error means
//! nothing changed.

use super::proposal::{
    Ballot, ExecutionReceipt, Proposal, ProposalStatus, ReleaseReceipt, VoteSide,
};
use crate::clock::DAY_SECS;
use crate::error::{DurationBound, TreasuryError, TreasuryResult};
use crate::ledger::{AccountId, Amount, Ledger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shortest voting window, in days.
pub const MIN_DURATION_DAYS: u64 = 1;

/// Longest voting window, in days.
pub const MAX_DURATION_DAYS: u64 = 30;

/// Ordered store of withdrawal proposals. Ids are indices; nothing is
/// ever removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRegistry {
    proposals: Vec<Proposal>,
}

impl ProposalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a withdrawal proposal for `amount` and return its id.
    ///
    /// The proposer's balance is checked, not reserved.
    pub fn propose(
        &mut self,
        ledger: &Ledger,
        proposer: AccountId,
        amount: Amount,
        description: String,
        duration_days: u64,
        now: u64,
    ) -> TreasuryResult<u64> {
        if amount.is_zero() || amount > ledger.balance_of(&proposer) {
            return Err(TreasuryError::InsufficientFunds);
        }
        if duration_days > MAX_DURATION_DAYS {
            return Err(TreasuryError::DurationOutOfRange(DurationBound::TooLong));
        }
        if duration_days < MIN_DURATION_DAYS {
            return Err(TreasuryError::DurationOutOfRange(DurationBound::TooShort));
        }

        let id = self.proposals.len() as u64;
        self.proposals.push(Proposal {
            id,
            proposer,
            amount,
            description,
            created_at: now,
            expires_at: now.saturating_add(duration_days * DAY_SECS),
            yes_weight: Amount::ZERO,
            no_weight: Amount::ZERO,
            votes: BTreeMap::new(),
            executed: false,
            released_to: None,
        });

        Ok(id)
    }

    /// Cast `weight` behind `side` on proposal `id`.
    ///
    /// Weight is validated against the voter's live balance on every call
    /// and is not locked; repeated votes accumulate. A zero weight is
    /// accepted and leaves the tally unchanged, but the voter still needs a
    /// non-zero balance.
    pub fn vote(
        &mut self,
        ledger: &Ledger,
        voter: AccountId,
        id: u64,
        side: VoteSide,
        weight: Amount,
        now: u64,
    ) -> TreasuryResult<()> {
        let balance = ledger.balance_of(&voter);
        if balance.is_zero() || weight > balance {
            return Err(TreasuryError::InsufficientTokens);
        }
        let proposal = self.get_mut(id)?;
        if !proposal.is_open(now) {
            return Err(TreasuryError::VotingClosed);
        }

        let overflow = || TreasuryError::InvalidInput("weight overflows the tally".to_string());
        let mut ballot = proposal.votes.get(&voter).copied().unwrap_or_default();
        let (yes_weight, no_weight) = match side {
            VoteSide::Yes => {
                ballot.yes = ballot.yes.checked_add(weight).ok_or_else(overflow)?;
                (
                    proposal.yes_weight.checked_add(weight).ok_or_else(overflow)?,
                    proposal.no_weight,
                )
            }
            VoteSide::No => {
                ballot.no = ballot.no.checked_add(weight).ok_or_else(overflow)?;
                (
                    proposal.yes_weight,
                    proposal.no_weight.checked_add(weight).ok_or_else(overflow)?,
                )
            }
        };

        proposal.yes_weight = yes_weight;
        proposal.no_weight = no_weight;
        proposal.votes.insert(voter, ballot);
        Ok(())
    }

    /// Finalize a proposal whose window has closed.
    ///
    /// Succeeds regardless of outcome and moves no funds. Only the first call
    /// records `recipient`; later calls report `first_release == false`.
    pub fn release(
        &mut self,
        id: u64,
        recipient: AccountId,
        now: u64,
    ) -> TreasuryResult<ReleaseReceipt> {
        let proposal = self.get_mut(id)?;
        if proposal.is_open(now) {
            return Err(TreasuryError::VotingNotExpired);
        }

        let first_release = proposal.released_to.is_none();
        if first_release {
            proposal.released_to = Some(recipient);
        }

        Ok(ReleaseReceipt {
            proposal_id: id,
            recipient,
            first_release,
        })
    }

    /// Pay out an approved proposal to `recipient`.
    ///
    /// Only the proposer may call this, once, after the window closes and
    /// only if yes weight strictly exceeds no weight.
    pub fn execute(
        &mut self,
        ledger: &mut Ledger,
        caller: AccountId,
        id: u64,
        recipient: AccountId,
        now: u64,
    ) -> TreasuryResult<ExecutionReceipt> {
        let proposal = self.get_mut(id)?;
        if proposal.is_open(now) {
            return Err(TreasuryError::VotingNotExpired);
        }
        if !proposal.is_approved() {
            return Err(TreasuryError::NotApproved);
        }
        if caller != proposal.proposer {
            return Err(TreasuryError::Unauthorized);
        }
        if proposal.executed {
            return Err(TreasuryError::AlreadyExecuted);
        }

        let transfer = ledger.debit(&proposal.proposer, proposal.amount, recipient)?;
        proposal.executed = true;

        Ok(ExecutionReceipt {
            proposal_id: id,
            amount: transfer.amount,
            recipient: transfer.to,
            executed_at: now,
        })
    }

    pub fn get(&self, id: u64) -> TreasuryResult<&Proposal> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.proposals.get(idx))
            .ok_or(TreasuryError::NotFound(id))
    }

    fn get_mut(&mut self, id: u64) -> TreasuryResult<&mut Proposal> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.proposals.get_mut(idx))
            .ok_or(TreasuryError::NotFound(id))
    }

    pub fn status(&self, id: u64, now: u64) -> TreasuryResult<ProposalStatus> {
        Ok(self.get(id)?.status(now))
    }

    /// All proposals in id order.
    pub fn list(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// Total weight a voter has cast on a proposal.
    pub fn ballot(&self, id: u64, voter: &AccountId) -> TreasuryResult<Ballot> {
        Ok(self.get(id)?.votes.get(voter).copied().unwrap_or_default())
    }
}
