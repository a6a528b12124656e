//! Withdrawal proposal records.

use crate::error::TreasuryError;
use crate::ledger::{AccountId, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Side of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteSide {
    Yes,
    No,
}

impl fmt::Display for VoteSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteSide::Yes => write!(f, "yes"),
            VoteSide::No => write!(f, "no"),
        }
    }
}

/// Accepts `yes` / `no` in any case. Anything else is `InvalidInput`.
impl FromStr for VoteSide {
    type Err = TreasuryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(VoteSide::Yes),
            "no" => Ok(VoteSide::No),
            _ => Err(TreasuryError::InvalidInput(format!(
                "option must be 'yes' or 'no', got '{}'",
                s
            ))),
        }
    }
}

/// Weight one voter has put behind each side of a proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub yes: Amount,
    pub no: Amount,
}

/// Derived lifecycle state. Never stored; see [`Proposal::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    /// Voting window still running.
    Open,
    /// Window elapsed, not executed.
    Closed,
    /// Funds sent. Terminal.
    Executed,
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProposalStatus::Open => write!(f, "open"),
            ProposalStatus::Closed => write!(f, "closed"),
            ProposalStatus::Executed => write!(f, "executed"),
        }
    }
}

/// A single withdrawal request with its own voting window and tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub proposer: AccountId,
    pub amount: Amount,
    pub description: String,
    pub created_at: u64,
    pub expires_at: u64,
    pub yes_weight: Amount,
    pub no_weight: Amount,
    pub votes: BTreeMap<AccountId, Ballot>,
    pub executed: bool,
    /// Recipient named by the first `release`, if any.
    #[serde(default)]
    pub released_to: Option<AccountId>,
}

impl Proposal {
    /// Voting is open strictly before `expires_at`.
    pub fn is_open(&self, now: u64) -> bool {
        now < self.expires_at
    }

    /// Strict majority of cast weight. A tie is not approval.
    pub fn is_approved(&self) -> bool {
        self.yes_weight > self.no_weight
    }

    pub fn status(&self, now: u64) -> ProposalStatus {
        if self.executed {
            ProposalStatus::Executed
        } else if self.is_open(now) {
            ProposalStatus::Open
        } else {
            ProposalStatus::Closed
        }
    }

    pub fn view(&self, now: u64) -> ProposalView {
        ProposalView {
            proposal: self.clone(),
            status: self.status(now),
            approved: self.is_approved(),
        }
    }
}

/// Point-in-time snapshot of a proposal with its derived state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalView {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub status: ProposalStatus,
    pub approved: bool,
}

/// Proof that a withdrawal left the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    pub proposal_id: u64,
    pub amount: Amount,
    pub recipient: AccountId,
    pub executed_at: u64,
}

/// Outcome of `release`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseReceipt {
    pub proposal_id: u64,
    pub recipient: AccountId,
    /// False when an earlier call already finalized the proposal.
    pub first_release: bool,
}
