use super::session::Session;
use treasury::ledger::{AccountId, Amount};

/// Open a withdrawal proposal against the proposer's own balance
///
/// The voting window is `duration_days` whole days starting now. Prints the
/// new proposal id.
pub async fn execute(
    session: &Session,
    account: AccountId,
    amount: Amount,
    description: String,
    duration_days: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = session.load()?;
    let id = loaded
        .pool
        .propose(account, amount, description, duration_days)
        .await?;
    let expires_at = loaded.pool.proposal(id).await?.proposal.expires_at;
    session.commit(loaded).await?;

    println!("Proposal {} created", id);
    println!("Amount: {}", amount);
    println!("Voting closes at: {}", format_unix(expires_at));
    Ok(())
}

/// RFC 3339 rendering of a unix timestamp for operator output.
pub(super) fn format_unix(secs: u64) -> String {
    let time = std::time::UNIX_EPOCH + std::time::Duration::from_secs(secs);
    humantime::format_rfc3339_seconds(time).to_string()
}
