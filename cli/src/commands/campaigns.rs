//! Campaigns Command - List campaigns

use std::path::PathBuf;

use clap::Args;
use cipherkind_client::{BoardState, CampaignSnapshot};
use cipherkind_primitives::{Address, CampaignId};
use tracing::warn;

use super::context::Context;

/// List campaigns with their totals
#[derive(Args)]
pub struct CampaignsCommand {
    /// Show only this campaign
    #[arg(long)]
    id: Option<CampaignId>,

    /// Account to decrypt totals as
    #[arg(long)]
    account: Option<Address>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl CampaignsCommand {
    pub async fn execute(
        self,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let ctx = Context::connect(config_path, data_dir, self.account, false).await?;
        let target = ctx.config.campaign.default_target_cents;

        // Totals stay hidden when encryption cannot start
        if let Err(e) = ctx.session.initialize_encryption().await {
            warn!(error = %e, "Listing without decryption");
        }

        if let Some(id) = self.id {
            let mut view = ctx.session.campaign(id).with_target(target);
            view.refresh().await?;

            if self.json {
                println!("{}", serde_json::to_string_pretty(&view.snapshot())?);
            } else {
                println!("{}", view.render());
            }
            return Ok(());
        }

        let mut board = ctx.session.board().with_target(target);
        board.load().await?;

        if self.json {
            let snapshots: Vec<CampaignSnapshot> =
                board.views().iter().filter_map(|v| v.snapshot()).collect();
            println!("{}", serde_json::to_string_pretty(&snapshots)?);
        } else {
            println!("{}", board.render());
            if board.state() == BoardState::Ready {
                println!();
                for view in board.views() {
                    let title = view.campaign().map(|c| c.title.as_str()).unwrap_or("");
                    println!("{}  {}", view.id(), title);
                }
            }
        }

        ctx.print_notices();
        Ok(())
    }
}
