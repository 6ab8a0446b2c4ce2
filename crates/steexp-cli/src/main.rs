//! Steexp CLI - Look up ledger accounts from the terminal
//!
//! # Quick Start
//!
//! ```bash
//! # Print an account page from the public network
//! steexp account GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN
//!
//! # Same account as JSON, from testnet
//! steexp --network testnet account GA5Z... --json
//!
//! # Known issuers
//! steexp anchors
//!
//! # Interactive view
//! steexp tui GA5Z...
//! ```

use std::sync::Arc;

use clap::{Parser, Subcommand};
use steexp_explorer::{AccountExplorer, ExplorerConfig, LoggingConfig};
use steexp_horizon::HorizonClient;
use steexp_types::Network;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod display;

use commands::{account, anchors};

/// Steexp - ledger account explorer
#[derive(Parser)]
#[command(name = "steexp")]
#[command(author = "Steexp Contributors")]
#[command(version)]
#[command(about = "Inspect ledger accounts: balances, signers, thresholds, flags and history", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, env = "STEEXP_CONFIG")]
    config: Option<String>,

    /// Network to query (public, testnet, futurenet, local)
    #[arg(long, global = true)]
    network: Option<String>,

    /// Horizon URL, overriding the network's
    #[arg(long, global = true)]
    horizon: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one account
    Account {
        /// Account id (G... public key)
        account_id: String,

        /// Print the composed page as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the known anchors
    Anchors {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the interactive account view
    Tui {
        /// Account to open with
        account_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = ExplorerConfig::load(cli.config.as_deref())?;
    if let Some(network) = cli.network.as_deref() {
        config.horizon.network = network.parse::<Network>().map_err(anyhow::Error::msg)?;
    }
    if let Some(url) = cli.horizon {
        config.horizon.url = Some(url);
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    match cli.log_level {
        Some(level) => config.logging.level = level,
        // Log lines would tear the alternate screen.
        None if matches!(cli.command, Commands::Tui { .. }) => config.logging.level = "off".to_string(),
        None => {}
    }

    init_logging(&config.logging)?;

    let horizon = HorizonClient::new(config.horizon.client_config())?;
    tracing::debug!(horizon = %horizon.base_url(), network = %config.horizon.network, "Using Horizon");

    let link_client = horizon.clone();
    let explorer = AccountExplorer::new(Arc::new(horizon.clone()), config.anchors.registry())
        .with_lists(config.lists)
        .with_json_link(move |account_id| link_client.account_url(account_id));

    match cli.command {
        Commands::Account { account_id, json } => {
            account::show_account(&explorer, &horizon, &account_id, json).await?;
        }
        Commands::Anchors { json } => {
            anchors::list_anchors(explorer.anchors(), json)?;
        }
        Commands::Tui { account_id } => {
            steexp_tui::run_account_tui(explorer, horizon, account_id).await?;
        }
    }

    Ok(())
}

/// Initialize logging to stderr so stdout stays clean for output and JSON
fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
