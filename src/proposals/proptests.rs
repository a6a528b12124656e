//! Property-based tests for the withdrawal lifecycle.
//!
//! Drives random deposit, propose, vote, release and execute calls through
//! the registry while time moves forward, then checks that:
//! - each balance equals its deposits minus its executed proposals
//! - total custody equals deposits minus disbursements
//! - each proposal pays out at most once
//! - a rejected call leaves ledger and registry untouched

use super::{ProposalRegistry, VoteSide};
use crate::clock::DAY_SECS;
use crate::ledger::{AccountId, Amount, Ledger};
use proptest::prelude::*;
use std::collections::HashMap;

const ACCOUNTS: u8 = 3;

#[derive(Debug, Clone)]
enum Op {
    Deposit { account: u8, units: u64 },
    Propose { account: u8, units: u64, days: u64 },
    Vote { account: u8, proposal: u64, yes: bool, units: u64 },
    Release { proposal: u64, recipient: u8 },
    Execute { account: u8, proposal: u64 },
    Advance { hours: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ACCOUNTS, 0u64..1_000).prop_map(|(account, units)| Op::Deposit { account, units }),
        (0..ACCOUNTS, 0u64..1_200, 0u64..4)
            .prop_map(|(account, units, days)| Op::Propose { account, units, days }),
        (0..ACCOUNTS, 0u64..6, any::<bool>(), 0u64..800).prop_map(
            |(account, proposal, yes, units)| Op::Vote { account, proposal, yes, units }
        ),
        (0u64..6, 0..ACCOUNTS).prop_map(|(proposal, recipient)| Op::Release { proposal, recipient }),
        (0..ACCOUNTS, 0u64..6).prop_map(|(account, proposal)| Op::Execute { account, proposal }),
        (1u64..48).prop_map(|hours| Op::Advance { hours }),
    ]
}

fn account(id: u8) -> AccountId {
    AccountId::from_bytes([id + 1; 20])
}

fn units(n: u64) -> Amount {
    Amount::from_base_units(n as u128)
}

proptest! {
    #[test]
    fn lifecycle_conserves_funds(ops in prop::collection::vec(op_strategy(), 0..150)) {
        let mut ledger = Ledger::new();
        let mut registry = ProposalRegistry::new();
        let mut now: u64 = 1_700_000_000;
        let mut deposited: HashMap<u8, u128> = HashMap::new();
        let mut paid: HashMap<u8, u128> = HashMap::new();
        let mut executions: HashMap<u64, u32> = HashMap::new();

        for op in ops {
            let before = (ledger.clone(), registry.clone());
            let result = match op {
                Op::Deposit { account: id, units: n } => {
                    ledger.deposit(account(id), units(n)).map(|_| {
                        *deposited.entry(id).or_default() += n as u128;
                    })
                }
                Op::Propose { account: id, units: n, days } => registry
                    .propose(&ledger, account(id), units(n), "p".to_string(), days, now)
                    .map(|_| ()),
                Op::Vote { account: id, proposal, yes, units: n } => {
                    let side = if yes { VoteSide::Yes } else { VoteSide::No };
                    registry.vote(&ledger, account(id), proposal, side, units(n), now)
                }
                Op::Release { proposal, recipient } => {
                    registry.release(proposal, account(recipient), now).map(|_| ())
                }
                Op::Execute { account: id, proposal } => registry
                    .execute(&mut ledger, account(id), proposal, account(id), now)
                    .map(|receipt| {
                        *paid.entry(id).or_default() += receipt.amount.base_units();
                        *executions.entry(proposal).or_default() += 1;
                    }),
                Op::Advance { hours } => {
                    now += hours * DAY_SECS / 24;
                    Ok(())
                }
            };

            if result.is_err() {
                prop_assert_eq!(&ledger, &before.0);
                prop_assert_eq!(&registry, &before.1);
            }
        }

        let mut custody: u128 = 0;
        for id in 0..ACCOUNTS {
            let want = deposited.get(&id).copied().unwrap_or(0) - paid.get(&id).copied().unwrap_or(0);
            prop_assert_eq!(ledger.balance_of(&account(id)).base_units(), want);
            custody += want;
        }
        prop_assert_eq!(ledger.total_custody().base_units(), custody);

        let total_deposited: u128 = deposited.values().sum();
        let disbursed: u128 = ledger.disbursements().iter().map(|t| t.amount.base_units()).sum();
        prop_assert_eq!(ledger.total_custody().base_units(), total_deposited - disbursed);

        prop_assert!(executions.values().all(|&n| n == 1));
        for (id, _) in executions {
            prop_assert!(registry.get(id).unwrap().executed);
        }
    }
}
