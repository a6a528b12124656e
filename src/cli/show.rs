use super::propose::format_unix;
use super::session::Session;
use treasury::proposals::ProposalView;

/// Show one proposal with its current status
pub async fn execute(
    session: &Session,
    proposal: u64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = session.load()?;
    let view = loaded.pool.proposal(proposal).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }
    Ok(())
}

/// List every proposal in id order
pub async fn list(session: &Session, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = session.load()?;
    let views = loaded.pool.proposals().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if views.is_empty() {
        println!("No proposals");
        return Ok(());
    }
    for view in &views {
        let p = &view.proposal;
        println!(
            "#{:<4} {:<9} {:>24}  yes {} / no {}  {}",
            p.id,
            view.status.to_string(),
            p.amount.to_string(),
            p.yes_weight,
            p.no_weight,
            p.proposer.short()
        );
    }
    Ok(())
}

fn print_view(view: &ProposalView) {
    let p = &view.proposal;
    println!("Proposal #{}", p.id);
    println!("  Status:      {}", view.status);
    println!("  Proposer:    {}", p.proposer);
    println!("  Amount:      {}", p.amount);
    println!("  Description: {}", p.description);
    println!("  Created:     {}", format_unix(p.created_at));
    println!("  Closes:      {}", format_unix(p.expires_at));
    println!("  Yes weight:  {}", p.yes_weight);
    println!("  No weight:   {}", p.no_weight);
    println!("  Approved:    {}", if view.approved { "yes" } else { "no" });
    println!("  Voters:      {}", p.votes.len());
    if let Some(recipient) = &p.released_to {
        println!("  Released to: {}", recipient);
    }
}
