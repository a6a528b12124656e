use super::session::Session;
use treasury::ledger::AccountId;

/// Finalize a proposal whose voting window has closed
///
/// Moves no funds. Repeating the call is harmless; only the first recipient
/// is recorded.
pub async fn execute(
    session: &Session,
    proposal: u64,
    recipient: AccountId,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = session.load()?;
    let receipt = loaded.pool.release(proposal, recipient).await?;

    if receipt.first_release {
        session.commit(loaded).await?;
        println!("Proposal {} released to {}", proposal, receipt.recipient);
    } else {
        println!(
            "Proposal {} was already released to {}",
            proposal, receipt.recipient
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::session::{test_support::fresh_session, Session};
    use treasury::clock::DAY_SECS;

    fn alice() -> AccountId {
        AccountId::from_bytes([1; 20])
    }

    #[tokio::test]
    async fn test_release_before_and_after_expiry() {
        let (dir, session) = fresh_session(0);
        crate::cli::deposit::execute(&session, alice(), "1.0".parse().unwrap())
            .await
            .unwrap();
        crate::cli::propose::execute(&session, alice(), "0.5".parse().unwrap(), "d".into(), 1)
            .await
            .unwrap();

        let err = execute(&session, 0, alice()).await.unwrap_err();
        assert_eq!(err.to_string(), "Voting period has not yet expired");

        let later = Session::new(dir.path().join("pool.cbor"), Some(2 * DAY_SECS));
        execute(&later, 0, alice()).await.unwrap();
        execute(&later, 0, AccountId::from_bytes([2; 20])).await.unwrap();

        let view = later.load().unwrap().pool.proposal(0).await.unwrap();
        assert_eq!(view.proposal.released_to, Some(alice()));
    }

    #[tokio::test]
    async fn test_release_unknown_proposal() {
        let (_dir, session) = fresh_session(0);
        let err = execute(&session, 3, alice()).await.unwrap_err();
        assert_eq!(err.to_string(), "Withdrawal not found: 3");
    }
}
