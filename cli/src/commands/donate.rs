//! Donate Command - Encrypt and submit a donation

use std::path::PathBuf;

use clap::Args;
use cipherkind_client::ClientResult;
use cipherkind_primitives::{Address, CampaignId, TxHash};
use tracing::debug;

use super::context::Context;

/// Donate an encrypted amount
#[derive(Args)]
pub struct DonateCommand {
    /// Campaign to donate to
    #[arg(long)]
    campaign: CampaignId,

    /// Amount in major units, e.g. 25.50
    #[arg(long)]
    amount: String,

    /// Donor account (defaults to the configured one)
    #[arg(long)]
    account: Option<Address>,
}

impl DonateCommand {
    pub async fn execute(
        self,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let ctx = Context::connect(config_path, data_dir, self.account, true).await?;

        let campaign = ctx.session.gateway().get_campaign(&self.campaign).await?;
        let mut flow = ctx.session.donate(campaign.id, campaign.title.clone());

        let result: ClientResult<TxHash> = async {
            flow.set_amount(&self.amount)?;
            flow.encrypt().await?;
            println!("Encrypted amount: {}", flow.encrypted_preview());
            debug!(step = flow.step().number(), "Amount encrypted");

            flow.continue_to_confirm()?;
            flow.submit().await
        }
        .await;

        ctx.print_notices();
        let tx = result?;

        println!();
        println!("Campaign:  {}", campaign.title);
        println!("Tx hash:   {}", tx);
        Ok(())
    }
}
