//! amqpctl - Main Entry Point
//!
//! Manages plugins, VPCs and alarms on hosted message-broker instances
//! and waits for each change to settle before returning.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use amqpctl_cli::commands::{alarm, plugin, vpc};
use amqpctl_cli::output;
use amqpctl_common::{default_config_path, ClientConfig, VERSION};
use amqpctl_provider::ApiClient;

/// amqpctl - hosted broker control-plane client
#[derive(Parser)]
#[command(name = "amqpctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (defaults to ~/.amqpctl/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Control-plane base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// API key
    #[arg(long, env = "CLOUDAMQP_APIKEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage instance plugins
    #[command(subcommand)]
    Plugin(plugin::PluginCommands),

    /// Manage VPCs
    #[command(subcommand)]
    Vpc(vpc::VpcCommands),

    /// Manage instance alarms
    #[command(subcommand)]
    Alarm(alarm::AlarmCommands),

    /// Show version information
    Version,
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = ClientConfig::load(&path)?.with_env();

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.api_key = api_key.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("amqpctl v{}", VERSION);
        return Ok(());
    }

    let config = load_config(&cli)?;

    // Ctrl-C aborts any wait in progress
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, canceling");
            on_signal.cancel();
        }
    });

    let client = ApiClient::from_config(&config)?.with_cancellation(cancel);

    match cli.command {
        Commands::Plugin(cmd) => plugin::execute(cmd, &client, cli.format).await?,
        Commands::Vpc(cmd) => vpc::execute(cmd, &client, cli.format).await?,
        Commands::Alarm(cmd) => alarm::execute(cmd, &client, cli.format).await?,
        Commands::Version => {}
    }

    Ok(())
}
