use clap::{Parser, Subcommand};
use std::path::PathBuf;
use treasury::ledger::{AccountId, Amount};
use treasury::proposals::parse_duration_days;

pub mod balance;
pub mod config;
pub mod deposit;
pub mod execute;
pub mod init;
pub mod logging;
pub mod propose;
pub mod release;
pub mod session;
pub mod show;
pub mod version;
pub mod vote;

use config::{default_config_path, default_state_path, TreasuryConfig};
use session::Session;

#[derive(Parser)]
#[command(name = "treasury")]
#[command(author = "Treasury Project")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for a deposit-weighted custody pool", long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.local/share/treasury/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Path to pool state file (overrides the config's [state] path)
    #[arg(long, global = true)]
    pub state: Option<String>,

    /// Pin the clock to this unix time (seconds) for this invocation
    #[arg(long, global = true, hide = true)]
    pub now: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty pool state file
    Init {
        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Lock funds into the pool
    Deposit {
        /// Depositing account (0x-prefixed 20-byte hex)
        #[arg(long)]
        account: AccountId,

        /// Amount in whole units with up to 18 decimals (e.g., 1.0)
        #[arg(long)]
        amount: Amount,
    },

    /// Propose a withdrawal from your own balance
    Propose {
        /// Proposing account
        #[arg(long)]
        account: AccountId,

        /// Amount to withdraw
        #[arg(long)]
        amount: Amount,

        /// Free-form description shown to voters
        #[arg(long)]
        description: String,

        /// Voting window in whole days, 1 to 30 (e.g., 7, 7d, "30 days")
        #[arg(long, value_parser = parse_duration_days)]
        duration: u64,
    },

    /// Vote on an open proposal, weighted by your balance
    Vote {
        /// Voting account
        #[arg(long)]
        account: AccountId,

        /// Proposal id
        #[arg(long)]
        proposal: u64,

        /// yes or no
        #[arg(long)]
        side: String,

        /// Weight to cast in whole units (e.g., 0.25), at most your current balance
        #[arg(long, required_unless_present = "weight_units", conflicts_with = "weight_units")]
        weight: Option<Amount>,

        /// Weight to cast in base units (1.0 = 10^18 base units)
        #[arg(long)]
        weight_units: Option<u128>,
    },

    /// Finalize a proposal after its voting window closed
    Release {
        /// Proposal id
        #[arg(long)]
        proposal: u64,

        /// Recipient to record
        #[arg(long)]
        recipient: AccountId,
    },

    /// Execute an approved proposal (proposer only)
    Execute {
        /// Executing account; must be the proposer
        #[arg(long)]
        account: AccountId,

        /// Proposal id
        #[arg(long)]
        proposal: u64,

        /// Account receiving the withdrawn funds
        #[arg(long)]
        recipient: AccountId,
    },

    /// Show an account's deposited balance
    Balance {
        /// Account to query
        #[arg(long)]
        account: AccountId,
    },

    /// Show one proposal
    Show {
        /// Proposal id
        #[arg(long)]
        proposal: u64,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all proposals
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    let config = if config_path.exists() {
        TreasuryConfig::load(&config_path)?
    } else {
        TreasuryConfig::new(default_state_path(&config_path))
    };

    logging::init(&config.logging)?;

    let state_path = cli
        .state
        .map(PathBuf::from)
        .unwrap_or_else(|| config.state.path.clone());
    let session = Session::new(state_path, cli.now);

    match cli.command {
        Commands::Init { force } => init::execute(&session, &config_path, force).await,
        Commands::Deposit { account, amount } => deposit::execute(&session, account, amount).await,
        Commands::Propose {
            account,
            amount,
            description,
            duration,
        } => propose::execute(&session, account, amount, description, duration).await,
        Commands::Vote {
            account,
            proposal,
            side,
            weight,
            weight_units,
        } => {
            let weight = vote_weight(weight, weight_units)?;
            vote::execute(&session, account, proposal, side, weight).await
        }
        Commands::Release {
            proposal,
            recipient,
        } => release::execute(&session, proposal, recipient).await,
        Commands::Execute {
            account,
            proposal,
            recipient,
        } => execute::execute(&session, account, proposal, recipient).await,
        Commands::Balance { account } => balance::execute(&session, account).await,
        Commands::Show { proposal, json } => show::execute(&session, proposal, json).await,
        Commands::List { json } => show::list(&session, json).await,
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

/// Resolve `--weight` / `--weight-units`; clap guarantees exactly one is set.
fn vote_weight(weight: Option<Amount>, weight_units: Option<u128>) -> Result<Amount, String> {
    match (weight, weight_units) {
        (Some(weight), None) => Ok(weight),
        (None, Some(units)) => Ok(Amount::from_base_units(units)),
        _ => Err("Specify exactly one of --weight or --weight-units".to_string()),
    }
}
