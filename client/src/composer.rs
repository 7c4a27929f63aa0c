//! Campaign creation with an encrypted fundraising target

use cipherkind_primitives::CampaignId;
use tracing::{info, warn};

use crate::amount::Amount;
use crate::errors::{ClientError, ClientResult, ValidationError};
use crate::session::Session;

/// Demo campaigns: title, description, target in major units
pub const SEED_CAMPAIGNS: [(&str, &str, u32); 3] = [
    (
        "Clean Water Initiative",
        "Bringing safe water to remote communities",
        10_000,
    ),
    (
        "Education for All",
        "Supporting underprivileged children's education",
        15_000,
    ),
    (
        "Climate Action Fund",
        "Protecting our planet for future generations",
        20_000,
    ),
];

pub struct CampaignComposer {
    session: Session,
}

impl CampaignComposer {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Create a campaign whose target is encrypted for the connected account
    pub async fn create(
        &self,
        title: &str,
        description: &str,
        target: Amount,
    ) -> ClientResult<CampaignId> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }

        let account = self
            .session
            .wallet()
            .account()
            .ok_or(ValidationError::WalletNotConnected)?;

        let mut builder = self
            .session
            .encryption()
            .create_encrypted_input(self.session.contract_address(), account)?;
        builder.add32(target.cents());
        let input = builder.encrypt().await?;

        let gateway = self.session.gateway();
        let result = gateway
            .submit_campaign_creation(
                &account,
                title,
                description.trim(),
                &input.handles[0],
                &input.input_proof,
            )
            .await;

        let tx = match result {
            Ok(tx) => tx,
            Err(e) => {
                warn!(error = %e, "Campaign creation failed");
                self.session
                    .notices()
                    .error("Campaign Creation Failed", e.to_string());
                return Err(e.into());
            }
        };

        let id = gateway
            .transaction_receipt(&tx)
            .await?
            .and_then(|receipt| receipt.created_campaign())
            .ok_or_else(|| ClientError::MissingEvent(tx.to_string()))?;

        info!(campaign = %id.short(), tx = %tx.short(), "Campaign created");
        self.session
            .notices()
            .success("Campaign Created", format!("\"{}\" is now accepting donations.", title));
        Ok(id)
    }

    /// Same as [`create`](Self::create) with the target as typed
    pub async fn create_from_input(
        &self,
        title: &str,
        description: &str,
        target: &str,
    ) -> ClientResult<CampaignId> {
        let target = Amount::parse(target)?;
        self.create(title, description, target).await
    }

    /// Create the demo campaigns, returning their ids
    pub async fn seed(&self) -> ClientResult<Vec<CampaignId>> {
        let mut ids = Vec::with_capacity(SEED_CAMPAIGNS.len());
        for (title, description, target) in SEED_CAMPAIGNS {
            let target = Amount::from_cents(target.saturating_mul(100))?;
            ids.push(self.create(title, description, target).await?);
        }
        Ok(ids)
    }
}
