//! Treasury - Deposit-Weighted Custody Pool
//!
//! Depositors lock value into a shared pool, propose withdrawals from their
//! own balance, and vote on each other's proposals weighted by balance.
//! After a fixed voting window the proposer alone may execute an approved
//! withdrawal.
//!
//! Key principles:
//! - Funds are conserved: custody always equals deposits minus disbursements
//! - Open/Closed is derived from the clock on every read, never stored
//! - Every failure aborts the whole call with no partial mutation
//! - One writer at a time per pool, in arrival order
//!
//! ```no_run
//! use treasury::{clock::SystemClock, ledger::Amount, pool::Pool, proposals::VoteSide};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = Pool::new(SystemClock);
//! let alice = "0x1111111111111111111111111111111111111111".parse()?;
//!
//! pool.deposit(alice, "1.0".parse()?).await?;
//! let id = pool.propose(alice, "0.5".parse()?, "grant".into(), 7).await?;
//! pool.vote(alice, id, VoteSide::Yes, Amount::from_base_units(1000)).await?;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod error;
pub mod ledger;
pub mod pool;
pub mod proposals;
pub mod serialization;
pub mod storage;

pub use error::{ErrorKind, TreasuryError, TreasuryResult};
