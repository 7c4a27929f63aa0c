//! Devnet Command - Run the local contract and relayer

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use cipherkind_devnet::{DevnetChain, DevnetConfig, DevnetServer, ServerConfig};
use tokio::signal;
use tracing::{info, warn};

use crate::config;

/// Run a local devnet
#[derive(Args)]
pub struct DevnetCommand {
    /// HTTP bind address
    #[arg(long, default_value = "127.0.0.1:8545")]
    addr: SocketAddr,

    /// Chain id (defaults to the configured one)
    #[arg(long)]
    chain_id: Option<u64>,
}

impl DevnetCommand {
    pub async fn execute(
        self,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let config = config::resolve(config_path.as_deref(), data_dir.as_deref())?;
        let chain_id = self.chain_id.unwrap_or(config.network.chain_id);

        info!(chain_id, "Generating devnet keys, this takes a moment");
        let chain = DevnetChain::generate(DevnetConfig { chain_id }).await?;

        let mut server = DevnetServer::new(ServerConfig::at(self.addr), Arc::new(chain));
        let addr = server.start().await?;

        println!();
        println!("✅ Devnet running");
        println!();
        println!("RPC:       http://{}", addr);
        println!("Chain id:  {}", chain_id);
        println!("Contract:  {}", server.chain().contract_address());
        println!();
        println!("Press Ctrl+C to stop");

        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received shutdown signal");
            }
            _ = server.stopped() => {
                warn!("Devnet server stopped unexpectedly");
            }
        }

        server.stop()?;
        info!(blocks = server.chain().block_number(), "Devnet stopped");
        Ok(())
    }
}
