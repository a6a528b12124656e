use super::session::Session;
use treasury::ledger::AccountId;

/// Print an account's deposited balance
pub async fn execute(session: &Session, account: AccountId) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = session.load()?;
    println!("{}", loaded.pool.balance_of(&account).await);
    Ok(())
}
