use super::session::Session;
use treasury::ledger::{AccountId, Amount};

/// Lock funds into the pool for an account
pub async fn execute(
    session: &Session,
    account: AccountId,
    amount: Amount,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = session.load()?;
    let balance = loaded.pool.deposit(account, amount).await?;
    session.commit(loaded).await?;

    println!("Deposited {} for {}", amount, account);
    println!("Balance: {}", balance);
    Ok(())
}
