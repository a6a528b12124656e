//! Balance ledger for a custody pool.
//!
//! The ledger is the only authority on how much weight an account carries.
//! Balances rise on deposit and fall only when an approved withdrawal is
//! executed; the sum of all balances is the pool's total custody.

pub mod account;
pub mod amount;

#[cfg(test)]
mod proptests;

pub use account::AccountId;
pub use amount::Amount;

use crate::error::{TreasuryError, TreasuryResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Funds that left pool custody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Account whose balance was debited.
    pub from: AccountId,
    /// Destination outside the pool.
    pub to: AccountId,
    pub amount: Amount,
}

/// Per-account balances plus the record of disbursed funds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    balances: BTreeMap<AccountId, Amount>,
    #[serde(default)]
    disbursements: Vec<Transfer>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock `amount` into the pool on behalf of `account`.
    pub fn deposit(&mut self, account: AccountId, amount: Amount) -> TreasuryResult<Amount> {
        if amount.is_zero() {
            return Err(TreasuryError::InvalidAmount);
        }

        let current = self.balance_of(&account);
        let updated = current
            .checked_add(amount)
            .ok_or(TreasuryError::InvalidAmount)?;
        // Custody is the sum of balances, so it must not overflow either.
        self.total_custody()
            .checked_add(amount)
            .ok_or(TreasuryError::InvalidAmount)?;

        self.balances.insert(account, updated);
        Ok(updated)
    }

    /// Deposited balance of `account`; zero for accounts never seen.
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Remove `amount` from `account` and release it from custody to
    /// `destination`.
    ///
    /// Only withdrawal execution calls this. Balances are checked but not
    /// reserved when a proposal is created, so a shortfall is still possible
    /// and is reported as [`TreasuryError::InsufficientFunds`].
    pub(crate) fn debit(
        &mut self,
        account: &AccountId,
        amount: Amount,
        destination: AccountId,
    ) -> TreasuryResult<Transfer> {
        let remaining = self
            .balance_of(account)
            .checked_sub(amount)
            .ok_or(TreasuryError::InsufficientFunds)?;

        self.balances.insert(*account, remaining);

        let transfer = Transfer {
            from: *account,
            to: destination,
            amount,
        };
        self.disbursements.push(transfer.clone());
        Ok(transfer)
    }

    /// Total value held by the pool.
    pub fn total_custody(&self) -> Amount {
        // Deposits refuse to push the sum past u128::MAX, so this never saturates.
        let units = self
            .balances
            .values()
            .fold(0u128, |acc, b| acc.saturating_add(b.base_units()));
        Amount::from_base_units(units)
    }

    /// Transfers out of custody, oldest first.
    pub fn disbursements(&self) -> &[Transfer] {
        &self.disbursements
    }

    /// Accounts with a recorded balance, in address order.
    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, &Amount)> {
        self.balances.iter()
    }
}
