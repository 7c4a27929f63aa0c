//! CipherKind CLI
//!
//! Command-line client for private donations, plus a local devnet.
//!
//! # Usage
//!
//! ```bash
//! # Write a config for the local devnet
//! cipherkind init --network local --account 0xa1a1...
//!
//! # Run the devnet (contract + relayer) on 127.0.0.1:8545
//! cipherkind devnet
//!
//! # Create the demo campaigns and list them
//! cipherkind seed
//! cipherkind campaigns
//!
//! # Donate 25.50 to a campaign
//! cipherkind donate --campaign 0x1234... --amount 25.50
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;

use commands::{
    CampaignsCommand, CreateCommand, DevnetCommand, DonateCommand, InitCommand, SeedCommand,
    StatusCommand,
};

/// CipherKind private donations
#[derive(Parser)]
#[command(name = "cipherkind")]
#[command(author = "CipherKind Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Private donations with encrypted campaign totals", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory
    #[arg(short, long, global = true, env = "CIPHERKIND_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a configuration file
    Init(InitCommand),

    /// Run a local devnet
    Devnet(DevnetCommand),

    /// List campaigns
    Campaigns(CampaignsCommand),

    /// Donate an encrypted amount
    Donate(DonateCommand),

    /// Create a campaign
    Create(CreateCommand),

    /// Create the demo campaigns
    Seed(SeedCommand),

    /// Show endpoint status
    Status(StatusCommand),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `init` writes the config, so it must not require one
    let settings = match &cli.command {
        Commands::Init(_) | Commands::Version => config::LoggingSettings::default(),
        _ => config::resolve(cli.config.as_deref(), cli.data_dir.as_deref())
            .map(|c| c.logging)
            .unwrap_or_default(),
    };
    let level = cli.log_level.clone().unwrap_or(settings.level);
    logging::init(&level, cli.json_logs || settings.format == "json")?;

    match cli.command {
        Commands::Init(cmd) => cmd.execute(cli.data_dir).await,
        Commands::Devnet(cmd) => cmd.execute(cli.config, cli.data_dir).await,
        Commands::Campaigns(cmd) => cmd.execute(cli.config, cli.data_dir).await,
        Commands::Donate(cmd) => cmd.execute(cli.config, cli.data_dir).await,
        Commands::Create(cmd) => cmd.execute(cli.config, cli.data_dir).await,
        Commands::Seed(cmd) => cmd.execute(cli.config, cli.data_dir).await,
        Commands::Status(cmd) => cmd.execute(cli.config, cli.data_dir).await,
        Commands::Version => {
            println!("cipherkind {}", env!("CARGO_PKG_VERSION"));
            println!("Encryption: TFHE-rs compact public key");
            Ok(())
        }
    }
}
