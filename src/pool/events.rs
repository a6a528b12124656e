//! Pool event stream.
//!
//! Every successful mutation is published once on a broadcast channel.
//! Subscribers receive events in the order the pool applied them. A
//! subscriber that falls more than [`EVENT_CAPACITY`] events behind skips the
//! oldest ones (logged) rather than blocking the pool.

use crate::ledger::{AccountId, Amount};
use crate::proposals::{ExecutionReceipt, ReleaseReceipt, VoteSide};
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

/// Events buffered per subscriber before lagging.
pub const EVENT_CAPACITY: usize = 256;

/// Observable state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PoolEvent {
    Deposited {
        account: AccountId,
        amount: Amount,
        balance: Amount,
    },
    ProposalCreated {
        id: u64,
        proposer: AccountId,
        amount: Amount,
        expires_at: u64,
    },
    VoteCast {
        id: u64,
        voter: AccountId,
        side: VoteSide,
        weight: Amount,
    },
    /// Only the first release of a proposal is published.
    Released(ReleaseReceipt),
    Executed(ExecutionReceipt),
}

/// Stream of [`PoolEvent`]s for one subscriber.
pub struct EventStream {
    inner: BroadcastStream<PoolEvent>,
}

impl EventStream {
    pub(crate) fn new(receiver: broadcast::Receiver<PoolEvent>) -> Self {
        Self {
            inner: BroadcastStream::new(receiver),
        }
    }
}

impl Stream for EventStream {
    type Item = PoolEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match self.inner.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(event))) => return Poll::Ready(Some(event)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    tracing::warn!(skipped, "event subscriber lagged, dropping oldest events");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
