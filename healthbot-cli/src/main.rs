//! # HealthBot
//!
//! Usage:
//!   healthbot                          # Interactive chat
//!   healthbot ask "fever, cough"       # One reply, then exit
//!   healthbot --mode detailed --no-web # Detailed replies without web search
//!   healthbot index rebuild            # Re-index data/medical_documents
//!   healthbot index status             # Inspect the persisted index

use anyhow::{Context, Result};
use clap::Parser;
use healthbot_cli::{Cli, Command, IndexAction, commands, telemetry};
use healthbot_core::{AppContext, HealthbotConfig, QueryOptions};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_logging(cli.verbose);

    let mut config =
        HealthbotConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);
    debug!(
        paths = ?config.paths,
        mode = %config.response.mode,
        web = config.web.enabled,
        "configuration loaded"
    );

    let options = QueryOptions::from_config(&config);
    let ctx = AppContext::from_config(config).context("failed to initialise HealthBot")?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => commands::chat(&ctx, options).await,
        Command::Ask { query } => commands::ask(&ctx, &query, options).await,
        Command::Index { action: IndexAction::Rebuild } => commands::index_rebuild(&ctx).await,
        Command::Index { action: IndexAction::Status } => commands::index_status(&ctx),
    }
}
