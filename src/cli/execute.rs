use super::propose::format_unix;
use super::session::Session;
use treasury::ledger::AccountId;

/// Pay out an approved proposal
///
/// Only the proposer may execute, once, after the voting window closed with
/// more yes weight than no weight.
pub async fn execute(
    session: &Session,
    account: AccountId,
    proposal: u64,
    recipient: AccountId,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = session.load()?;
    let receipt = loaded.pool.execute(account, proposal, recipient).await?;
    session.commit(loaded).await?;

    println!("✅ Executed proposal {}", receipt.proposal_id);
    println!("Amount: {}", receipt.amount);
    println!("Recipient: {}", receipt.recipient);
    println!("Executed at: {}", format_unix(receipt.executed_at));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::session::{test_support::fresh_session, Session};
    use treasury::clock::DAY_SECS;
    use treasury::ledger::Amount;

    fn alice() -> AccountId {
        AccountId::from_bytes([1; 20])
    }

    fn bob() -> AccountId {
        AccountId::from_bytes([2; 20])
    }

    #[tokio::test]
    async fn test_execute_flow_across_invocations() {
        let (dir, session) = fresh_session(0);
        crate::cli::deposit::execute(&session, alice(), "1.0".parse().unwrap())
            .await
            .unwrap();
        crate::cli::propose::execute(&session, alice(), "0.5".parse().unwrap(), "d".into(), 1)
            .await
            .unwrap();
        crate::cli::vote::execute(&session, alice(), 0, "yes".into(), Amount::from_base_units(1000))
            .await
            .unwrap();

        let err = execute(&session, alice(), 0, alice()).await.unwrap_err();
        assert_eq!(err.to_string(), "Voting period has not yet expired");

        let later = Session::new(dir.path().join("pool.cbor"), Some(2 * DAY_SECS));
        let err = execute(&later, bob(), 0, bob()).await.unwrap_err();
        assert_eq!(err.to_string(), "Only the owner can execute the withdrawal");

        execute(&later, alice(), 0, alice()).await.unwrap();
        let err = execute(&later, alice(), 0, alice()).await.unwrap_err();
        assert_eq!(err.to_string(), "Withdrawal has already been executed");

        let pool = later.load().unwrap().pool;
        assert_eq!(pool.balance_of(&alice()).await, "0.5".parse::<Amount>().unwrap());
    }
}
