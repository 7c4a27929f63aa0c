//! Status Command - Show endpoint status

use std::path::PathBuf;

use clap::Args;
use cipherkind_fhe::{HttpRelayer, RelayerTransport};
use cipherkind_gateway::{ContractGateway, PlatformStats, RpcGateway};

use crate::config;

/// Show endpoint status
#[derive(Args)]
pub struct StatusCommand {
    /// RPC endpoint to query (defaults to the configured one)
    #[arg(short, long)]
    rpc: Option<String>,
}

impl StatusCommand {
    pub async fn execute(
        self,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let config = config::resolve(config_path.as_deref(), data_dir.as_deref())?;
        let rpc = match self.rpc {
            Some(rpc) => rpc,
            None => config.rpc_url()?.to_string(),
        };

        println!("Querying {}...", rpc);
        println!();

        match query_status(&rpc).await {
            Ok(status) => {
                println!("✅ Contract is reachable");
                println!();
                println!("Contract:   {}", status.contract);
                println!("Chain id:   {}", status.chain_id);
                if status.chain_id != config.network.chain_id {
                    println!(
                        "⚠️  Configured chain id is {}, encryption will not initialize",
                        config.network.chain_id
                    );
                }
                println!(
                    "Campaigns:  {} ({} active)",
                    status.stats.total_campaigns, status.stats.active_campaigns
                );
                println!("Donations:  {}", status.stats.total_donations);
                match config.wallet.account {
                    Some(account) => println!("Account:    {}", account),
                    None => println!("Account:    not configured"),
                }
            }
            Err(e) => {
                println!("❌ Could not reach the contract");
                println!();
                println!("Error: {}", e);
                println!();
                if config.network.name == "local" {
                    println!("Is the devnet running? Start it with:");
                    println!("  cipherkind devnet");
                }
            }
        }

        Ok(())
    }
}

struct Status {
    contract: cipherkind_primitives::Address,
    chain_id: u64,
    stats: PlatformStats,
}

async fn query_status(rpc: &str) -> anyhow::Result<Status> {
    let gateway = RpcGateway::discover(rpc).await?;
    let stats = gateway.platform_stats().await?;
    let chain_id = HttpRelayer::new(rpc)?.chain_id().await?;

    Ok(Status {
        contract: gateway.contract_address(),
        chain_id,
        stats,
    })
}
