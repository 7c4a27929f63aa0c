//! Create Command - Create a campaign with an encrypted target

use std::path::PathBuf;

use clap::Args;
use cipherkind_primitives::Address;

use super::context::Context;

/// Create a campaign
#[derive(Args)]
pub struct CreateCommand {
    /// Campaign title
    #[arg(long)]
    title: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Fundraising target in major units; stored encrypted
    #[arg(long)]
    target: String,

    /// Creator account (defaults to the configured one)
    #[arg(long)]
    account: Option<Address>,
}

impl CreateCommand {
    pub async fn execute(
        self,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        let ctx = Context::connect(config_path, data_dir, self.account, true).await?;

        let result = ctx
            .session
            .composer()
            .create_from_input(&self.title, &self.description, &self.target)
            .await;

        ctx.print_notices();
        let id = result?;

        println!();
        println!("Campaign id: {}", id);
        Ok(())
    }
}
