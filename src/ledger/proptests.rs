//! Property-based tests for ledger conservation.
//!
//! For any interleaving of deposits and debits:
//! - each balance equals its deposits minus its debits
//! - total custody equals the sum of balances
//! - a rejected call changes nothing

use super::{AccountId, Amount, Ledger};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    Deposit { account: u8, units: u64 },
    Debit { account: u8, units: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4, 0u64..1_000).prop_map(|(account, units)| Op::Deposit { account, units }),
        (0u8..4, 0u64..1_500).prop_map(|(account, units)| Op::Debit { account, units }),
    ]
}

fn account(id: u8) -> AccountId {
    AccountId::from_bytes([id; 20])
}

proptest! {
    /// Property: balances equal deposits minus executed withdrawals
    #[test]
    fn balances_conserved(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut ledger = Ledger::new();
        let mut expected: HashMap<u8, u128> = HashMap::new();
        let mut disbursed: u128 = 0;

        for op in ops {
            match op {
                Op::Deposit { account: id, units } => {
                    let before = ledger.clone();
                    match ledger.deposit(account(id), Amount::from_base_units(units as u128)) {
                        Ok(_) => *expected.entry(id).or_default() += units as u128,
                        Err(_) => {
                            prop_assert_eq!(units, 0);
                            prop_assert_eq!(&ledger, &before);
                        }
                    }
                }
                Op::Debit { account: id, units } => {
                    let before = ledger.clone();
                    match ledger.debit(&account(id), Amount::from_base_units(units as u128), account(9)) {
                        Ok(_) => {
                            *expected.entry(id).or_default() -= units as u128;
                            disbursed += units as u128;
                        }
                        Err(_) => prop_assert_eq!(&ledger, &before),
                    }
                }
            }
        }

        let mut sum: u128 = 0;
        for id in 0u8..4 {
            let want = expected.get(&id).copied().unwrap_or(0);
            prop_assert_eq!(ledger.balance_of(&account(id)).base_units(), want);
            sum += want;
        }
        prop_assert_eq!(ledger.total_custody().base_units(), sum);

        let paid: u128 = ledger.disbursements().iter().map(|t| t.amount.base_units()).sum();
        prop_assert_eq!(paid, disbursed);
    }
}
