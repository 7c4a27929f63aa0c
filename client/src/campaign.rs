//! Campaign view
//!
//! Shows a campaign with its total decrypted for authorized viewers. A failed
//! decryption only hides the amount; progress keeps the last value that did
//! decrypt.

use cipherkind_gateway::{Campaign, EncryptedAggregate};
use cipherkind_primitives::{Address, CampaignId, CiphertextHandle};
use serde::Serialize;
use tracing::debug;

use crate::amount::{format_cents, PLACEHOLDER};
use crate::errors::ClientResult;
use crate::session::Session;

/// Target used for progress; the contract keeps the real target encrypted
pub const DEFAULT_TARGET_CENTS: u64 = 10_000;

/// `min(raised / target * 100, 100)`, 0 for a zero target
pub fn progress_percent(raised_cents: u64, target_cents: u64) -> f64 {
    if target_cents == 0 {
        return 0.0;
    }
    (raised_cents as f64 / target_cents as f64 * 100.0).min(100.0)
}

/// Render-ready state of a campaign
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSnapshot {
    pub id: CampaignId,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub completed_at: Option<u64>,
    pub donor_count: u64,
    pub encrypted_total: Option<CiphertextHandle>,
    /// Major units with two decimals, or the placeholder
    pub amount: String,
    pub progress: f64,
}

/// Read-only view of one campaign
pub struct CampaignView {
    session: Session,
    id: CampaignId,
    target_cents: u64,
    campaign: Option<Campaign>,
    aggregate: Option<EncryptedAggregate>,
    decrypted: Option<u64>,
    last_known: Option<u64>,
}

impl CampaignView {
    pub fn new(session: Session, id: CampaignId) -> Self {
        Self {
            session,
            id,
            target_cents: DEFAULT_TARGET_CENTS,
            campaign: None,
            aggregate: None,
            decrypted: None,
            last_known: None,
        }
    }

    pub fn with_target(mut self, target_cents: u64) -> Self {
        self.target_cents = target_cents;
        self
    }

    pub fn id(&self) -> CampaignId {
        self.id
    }

    pub fn campaign(&self) -> Option<&Campaign> {
        self.campaign.as_ref()
    }

    pub fn aggregate(&self) -> Option<&EncryptedAggregate> {
        self.aggregate.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.campaign.is_none()
    }

    /// Re-fetch the campaign and its aggregate, then try to decrypt
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let gateway = self.session.gateway();
        let campaign = gateway.get_campaign(&self.id).await?;
        let aggregate = gateway.get_encrypted_aggregate(&self.id).await?;

        self.campaign = Some(campaign);
        self.aggregate = Some(aggregate);

        self.try_decrypt().await;
        Ok(())
    }

    /// Decrypt the total if the instance and aggregate are both available.
    ///
    /// Never fails: any problem leaves the amount hidden.
    pub async fn try_decrypt(&mut self) -> Option<u64> {
        self.decrypted = self.decrypt_total().await;
        if let Some(value) = self.decrypted {
            self.last_known = Some(value);
        }
        self.decrypted
    }

    /// Amount as displayed: `25.50` or `***.**`
    pub fn display_amount(&self) -> String {
        self.decrypted
            .map(format_cents)
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    /// Progress towards the target from the last decrypted total
    pub fn progress(&self) -> f64 {
        progress_percent(self.last_known.unwrap_or(0), self.target_cents)
    }

    pub fn snapshot(&self) -> Option<CampaignSnapshot> {
        let campaign = self.campaign.as_ref()?;
        Some(CampaignSnapshot {
            id: campaign.id,
            creator: campaign.creator,
            title: campaign.title.clone(),
            description: campaign.description.clone(),
            is_active: campaign.is_active,
            completed_at: campaign.completed_at,
            donor_count: campaign.donor_count,
            encrypted_total: self.aggregate.map(|a| a.encrypted_total_raised),
            amount: self.display_amount(),
            progress: self.progress(),
        })
    }

    /// Text card
    pub fn render(&self) -> String {
        let Some(campaign) = &self.campaign else {
            return format!("{} (loading)", self.id.short());
        };

        let status = if campaign.is_active { "" } else { " [completed]" };
        format!(
            "{}{}\n  {}\n  Encrypted Total: ${}\n  {} private donors · {:.1}%",
            campaign.title,
            status,
            campaign.description,
            self.display_amount(),
            campaign.donor_count,
            self.progress()
        )
    }

    async fn decrypt_total(&self) -> Option<u64> {
        let encryption = self.session.encryption();
        let aggregate = self.aggregate.as_ref()?;
        if !encryption.is_ready() {
            return None;
        }
        let account = self.session.wallet().account()?;

        match encryption
            .user_decrypt(
                &aggregate.encrypted_total_raised,
                &self.session.contract_address(),
                &account,
            )
            .await
        {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(campaign = %self.id.short(), error = %e, "Total stays hidden");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ready_session, session, Fixture};
    use cipherkind_fhe::FheError;
    use cipherkind_gateway::GatewayError;

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(progress_percent(2550, 10_000), 25.5);
        assert_eq!(progress_percent(25_000, 10_000), 100.0);
        assert_eq!(progress_percent(0, 10_000), 0.0);
        assert_eq!(progress_percent(10, 0), 0.0);
    }

    #[tokio::test]
    async fn test_decrypted_total_is_shown() {
        let fixture = Fixture::connected();
        let session = ready_session(&fixture).await;
        let id = fixture.gateway.add_campaign("Clean Water Initiative");
        fixture.instance.set_plaintext(fixture.gateway.total_of(&id), 2550);

        let mut view = session.campaign(id);
        assert!(view.is_loading());
        view.refresh().await.unwrap();

        assert_eq!(view.display_amount(), "25.50");
        assert_eq!(view.progress(), 25.5);
        assert!(view.render().contains("Encrypted Total: $25.50"));
        assert!(view.render().contains("25.5%"));
    }

    #[tokio::test]
    async fn test_zero_total_is_not_hidden() {
        let fixture = Fixture::connected();
        let session = ready_session(&fixture).await;
        let id = fixture.gateway.add_campaign("New");
        fixture.instance.set_plaintext(fixture.gateway.total_of(&id), 0);

        let mut view = session.campaign(id);
        view.refresh().await.unwrap();
        assert_eq!(view.display_amount(), "0.00");
    }

    #[tokio::test]
    async fn test_failed_decryption_shows_placeholder_and_keeps_progress() {
        let fixture = Fixture::connected();
        let session = ready_session(&fixture).await;
        let id = fixture.gateway.add_campaign("Education for All");
        fixture.instance.set_plaintext(fixture.gateway.total_of(&id), 5000);

        let mut view = session.campaign(id);
        view.refresh().await.unwrap();
        assert_eq!(view.progress(), 50.0);

        fixture
            .instance
            .fail_decryption(FheError::DecryptionDenied("not on ACL".into()));
        assert_eq!(view.try_decrypt().await, None);
        assert_eq!(view.display_amount(), PLACEHOLDER);
        assert_eq!(view.progress(), 50.0);
    }

    #[tokio::test]
    async fn test_never_decrypted_progress_is_zero() {
        let fixture = Fixture::connected();
        let session = ready_session(&fixture).await;
        let id = fixture.gateway.add_campaign("Climate Action Fund");

        // No plaintext registered: decryption returns no value
        let mut view = session.campaign(id);
        view.refresh().await.unwrap();

        let snapshot = view.snapshot().unwrap();
        assert_eq!(snapshot.amount, PLACEHOLDER);
        assert_eq!(snapshot.progress, 0.0);
        assert_eq!(snapshot.title, "Climate Action Fund");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["amount"], "***.**");
        assert_eq!(json["donorCount"], 0);
        assert_eq!(
            json["encryptedTotal"],
            fixture.gateway.total_of(&id).to_hex()
        );
    }

    #[tokio::test]
    async fn test_not_ready_does_not_decrypt() {
        let fixture = Fixture::connected();
        let session = session(&fixture);
        let id = fixture.gateway.add_campaign("Books");
        fixture.instance.set_plaintext(fixture.gateway.total_of(&id), 100);

        let mut view = session.campaign(id);
        view.refresh().await.unwrap();
        assert_eq!(view.display_amount(), PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_missing_campaign_is_an_error() {
        let fixture = Fixture::connected();
        let session = ready_session(&fixture).await;

        let mut view = session.campaign(CampaignId::new([0x42; 32]));
        let err = view.refresh().await.unwrap_err();
        assert!(matches!(err, crate::ClientError::Gateway(GatewayError::NotFound(_))));
        assert!(view.render().contains("loading"));
    }
}
