use super::session::Session;
use treasury::ledger::{AccountId, Amount};
use treasury::proposals::VoteSide;

/// Cast balance-weighted votes on an open proposal
///
/// `side` is `yes` or `no`. The weight must not exceed the voter's current
/// balance; repeated votes add up.
pub async fn execute(
    session: &Session,
    account: AccountId,
    proposal: u64,
    side: String,
    weight: Amount,
) -> Result<(), Box<dyn std::error::Error>> {
    let side: VoteSide = side.parse()?;
    let loaded = session.load()?;
    loaded.pool.vote(account, proposal, side, weight).await?;
    session.commit(loaded).await?;

    println!("Recorded {} vote of {} on proposal {}", side, weight, proposal);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::session::test_support::fresh_session;
    use treasury::proposals::Ballot;

    fn alice() -> AccountId {
        AccountId::from_bytes([1; 20])
    }

    async fn funded_proposal(session: &Session) {
        crate::cli::deposit::execute(session, alice(), "1.0".parse().unwrap())
            .await
            .unwrap();
        crate::cli::propose::execute(session, alice(), "0.5".parse().unwrap(), "desc".into(), 1)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_votes_accumulate_across_invocations() {
        let (_dir, session) = fresh_session(0);
        funded_proposal(&session).await;

        execute(&session, alice(), 0, "yes".into(), "0.25".parse().unwrap())
            .await
            .unwrap();
        execute(&session, alice(), 0, "YES".into(), "0.25".parse().unwrap())
            .await
            .unwrap();

        let view = session.load().unwrap().pool.proposal(0).await.unwrap();
        assert_eq!(view.proposal.yes_weight, "0.5".parse::<Amount>().unwrap());
        assert_eq!(
            view.proposal.votes.get(&alice()),
            Some(&Ballot {
                yes: "0.5".parse().unwrap(),
                no: Amount::ZERO,
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_side_rejected() {
        let (_dir, session) = fresh_session(0);
        funded_proposal(&session).await;

        let err = execute(&session, alice(), 0, "abstain".into(), "0.1".parse().unwrap())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid vote"));
    }

    #[tokio::test]
    async fn test_vote_without_balance_rejected() {
        let (_dir, session) = fresh_session(0);
        funded_proposal(&session).await;

        let err = execute(
            &session,
            AccountId::from_bytes([2; 20]),
            0,
            "no".into(),
            "0.1".parse().unwrap(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Insufficient tokens");
    }
}
