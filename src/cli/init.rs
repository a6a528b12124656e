use super::config::TreasuryConfig;
use super::session::Session;
use std::path::Path;
use treasury::storage::init_state;

/// Create an empty pool state file
///
/// Writes a default operator config next to it when `config_path` does not
/// exist yet. An existing state file is only replaced with `--force`.
pub async fn execute(
    session: &Session,
    config_path: &Path,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    init_state(session.state_path(), force)?;
    tracing::info!(path = %session.state_path().display(), force, "pool initialized");
    println!("✅ Created empty pool: {}", session.state_path().display());

    if !config_path.exists() {
        TreasuryConfig::create_default(config_path, session.state_path())?;
        println!("📝 Created config: {}", config_path.display());
    }

    Ok(())
}
