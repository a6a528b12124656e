//! Custody pool: the single-writer handle over one ledger and one registry.
//!
//! All operations take the pool's one async mutex for their entire
//! check-then-act, so balance checks and the mutations they guard never
//! interleave. `tokio::sync::Mutex` queues waiters in FIFO order, which
//! makes concurrent callers apply in arrival order. The clock is read while
//! the lock is held.
//!
//! Pools are independent: each owns its own state, lock and event channel.

pub mod events;

pub use events::{EventStream, PoolEvent, EVENT_CAPACITY};

use crate::clock::Clock;
use crate::error::{TreasuryError, TreasuryResult};
use crate::ledger::{AccountId, Amount, Ledger};
use crate::proposals::{
    ExecutionReceipt, ProposalRegistry, ProposalView, ReleaseReceipt, VoteSide,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

/// Complete pool state: balances, disbursements and every proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub ledger: Ledger,
    pub registry: ProposalRegistry,
}

/// Shared handle to a custody pool. Clones refer to the same pool.
pub struct Pool<C: Clock> {
    state: Arc<Mutex<PoolSnapshot>>,
    clock: C,
    events: broadcast::Sender<PoolEvent>,
}

impl<C: Clock + Clone> Clone for Pool<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: self.clock.clone(),
            events: self.events.clone(),
        }
    }
}

fn rejected(op: &'static str, err: &TreasuryError) {
    debug!(op, kind = err.kind().name(), reason = %err, "pool call rejected");
}

impl<C: Clock> Pool<C> {
    /// Create an empty pool.
    pub fn new(clock: C) -> Self {
        Self::from_snapshot(PoolSnapshot::default(), clock)
    }

    /// Resume a pool from persisted state.
    pub fn from_snapshot(snapshot: PoolSnapshot, clock: C) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(snapshot)),
            clock,
            events,
        }
    }

    /// Subscribe to events published after this call.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    fn publish(&self, event: PoolEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Current time as seen by this pool.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Lock `amount` into the pool for `account`. Returns the new balance.
    pub async fn deposit(&self, account: AccountId, amount: Amount) -> TreasuryResult<Amount> {
        let mut state = self.state.lock().await;
        let balance = state
            .ledger
            .deposit(account, amount)
            .inspect_err(|e| rejected("deposit", e))?;

        info!(account = %account, amount = %amount, balance = %balance, "deposit accepted");
        self.publish(PoolEvent::Deposited {
            account,
            amount,
            balance,
        });
        Ok(balance)
    }

    pub async fn balance_of(&self, account: &AccountId) -> Amount {
        self.state.lock().await.ledger.balance_of(account)
    }

    pub async fn total_custody(&self) -> Amount {
        self.state.lock().await.ledger.total_custody()
    }

    /// Open a withdrawal proposal. Returns its id.
    pub async fn propose(
        &self,
        proposer: AccountId,
        amount: Amount,
        description: String,
        duration_days: u64,
    ) -> TreasuryResult<u64> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let PoolSnapshot { ledger, registry } = &mut *state;

        let id = registry
            .propose(ledger, proposer, amount, description, duration_days, now)
            .inspect_err(|e| rejected("propose", e))?;
        let expires_at = registry.get(id)?.expires_at;

        info!(id, proposer = %proposer, amount = %amount, expires_at, "proposal created");
        self.publish(PoolEvent::ProposalCreated {
            id,
            proposer,
            amount,
            expires_at,
        });
        Ok(id)
    }

    /// Cast `weight` behind `side` on proposal `id`.
    pub async fn vote(
        &self,
        voter: AccountId,
        id: u64,
        side: VoteSide,
        weight: Amount,
    ) -> TreasuryResult<()> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let PoolSnapshot { ledger, registry } = &mut *state;

        registry
            .vote(ledger, voter, id, side, weight, now)
            .inspect_err(|e| rejected("vote", e))?;

        info!(id, voter = %voter.short(), side = %side, weight = %weight, "vote recorded");
        self.publish(PoolEvent::VoteCast {
            id,
            voter,
            side,
            weight,
        });
        Ok(())
    }

    /// Finalize a closed proposal. Safe to repeat.
    pub async fn release(&self, id: u64, recipient: AccountId) -> TreasuryResult<ReleaseReceipt> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let receipt = state
            .registry
            .release(id, recipient, now)
            .inspect_err(|e| rejected("release", e))?;

        if receipt.first_release {
            info!(id, recipient = %recipient, "proposal released");
            self.publish(PoolEvent::Released(receipt.clone()));
        } else {
            debug!(id, "proposal already released");
        }
        Ok(receipt)
    }

    /// Pay out approved proposal `id` to `recipient`. `caller` must be the
    /// proposer.
    pub async fn execute(
        &self,
        caller: AccountId,
        id: u64,
        recipient: AccountId,
    ) -> TreasuryResult<ExecutionReceipt> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let PoolSnapshot { ledger, registry } = &mut *state;

        let receipt = registry
            .execute(ledger, caller, id, recipient, now)
            .inspect_err(|e| rejected("execute", e))?;

        info!(
            id,
            amount = %receipt.amount,
            recipient = %receipt.recipient,
            custody = %ledger.total_custody(),
            "withdrawal executed"
        );
        self.publish(PoolEvent::Executed(receipt.clone()));
        Ok(receipt)
    }

    /// One proposal with its status derived from the current time.
    pub async fn proposal(&self, id: u64) -> TreasuryResult<ProposalView> {
        let state = self.state.lock().await;
        let now = self.clock.now();
        Ok(state.registry.get(id)?.view(now))
    }

    /// Every proposal, in id order.
    pub async fn proposals(&self) -> Vec<ProposalView> {
        let state = self.state.lock().await;
        let now = self.clock.now();
        state.registry.list().iter().map(|p| p.view(now)).collect()
    }

    /// Copy of the full state, for persistence.
    pub async fn snapshot(&self) -> PoolSnapshot {
        self.state.lock().await.clone()
    }
}
