//! Seed Command - Create the demo campaigns

use std::path::PathBuf;

use clap::Args;
use cipherkind_client::SEED_CAMPAIGNS;
use cipherkind_primitives::Address;

use super::context::Context;

/// Create the demo campaigns
#[derive(Args)]
pub struct SeedCommand {
    /// Creator account (defaults to the configured one)
    #[arg(long)]
    account: Option<Address>,
}

impl SeedCommand {
    pub async fn execute(
        self,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let ctx = Context::connect(config_path, data_dir, self.account, true).await?;

        let result = ctx.session.composer().seed().await;
        ctx.print_notices();
        let ids = result?;

        println!();
        for (id, (title, _, target)) in ids.iter().zip(SEED_CAMPAIGNS) {
            println!("{}  {} (target ${})", id, title, target);
        }
        Ok(())
    }
}
