//! Init Command - Write a client configuration

use std::path::PathBuf;

use clap::Args;
use cipherkind_primitives::Address;
use tracing::info;

use crate::config::{default_config_path, default_data_dir, CipherKindConfig};

/// Write a configuration file
#[derive(Args)]
pub struct InitCommand {
    /// Network to initialize for (local, sepolia)
    #[arg(short, long, default_value = "local")]
    network: String,

    /// JSON-RPC endpoint
    #[arg(long)]
    rpc_url: Option<String>,

    /// Wallet account
    #[arg(long)]
    account: Option<Address>,

    /// Deployed contract address
    #[arg(long)]
    contract: Option<Address>,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    force: bool,
}

impl InitCommand {
    pub async fn execute(self, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
        let data_dir = data_dir.unwrap_or_else(|| default_data_dir(&self.network));
        let config_path = default_config_path(&data_dir);

        info!("Initializing CipherKind for {} network", self.network);
        info!("Data directory: {}", data_dir.display());

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Already initialized at {}. Use --force to overwrite.",
                data_dir.display()
            );
        }

        let mut config = CipherKindConfig::for_network(&self.network)?;
        if let Some(rpc_url) = self.rpc_url {
            config.network.rpc_url = Some(rpc_url);
        }
        config.wallet.account = self.account;
        config.contract.address = self.contract;
        config.validate()?;
        config.save(&config_path)?;

        info!("Configuration saved to {}", config_path.display());

        println!();
        println!("✅ CipherKind initialized successfully!");
        println!();
        println!("Configuration: {}", config_path.display());
        println!();
        if self.network == "local" {
            println!("To start the local devnet:");
            println!("  cipherkind devnet --data-dir {}", data_dir.display());
        }
        if config.wallet.account.is_none() {
            println!("No wallet account set: pass --account to donate or create campaigns.");
        }

        Ok(())
    }
}
