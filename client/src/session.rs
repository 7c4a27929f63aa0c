//! Session context
//!
//! One encryption service, one gateway and one wallet per session, passed
//! explicitly to every flow instead of living in globals.

use std::sync::Arc;

use cipherkind_fhe::EncryptionService;
use cipherkind_gateway::ContractGateway;
use cipherkind_primitives::{Address, CampaignId};
use tracing::debug;

use crate::board::CampaignBoard;
use crate::campaign::CampaignView;
use crate::composer::CampaignComposer;
use crate::donation::DonationFlow;
use crate::errors::ClientResult;
use crate::notify::Notices;
use crate::wallet::WalletSession;

/// Shared handles for one user session; cheap to clone
#[derive(Clone)]
pub struct Session {
    encryption: Arc<EncryptionService>,
    gateway: Arc<dyn ContractGateway>,
    wallet: Arc<dyn WalletSession>,
    notices: Notices,
}

impl Session {
    pub fn new(
        encryption: Arc<EncryptionService>,
        gateway: Arc<dyn ContractGateway>,
        wallet: Arc<dyn WalletSession>,
    ) -> Self {
        Self {
            encryption,
            gateway,
            wallet,
            notices: Notices::new(),
        }
    }

    pub fn encryption(&self) -> &EncryptionService {
        &self.encryption
    }

    pub fn gateway(&self) -> &dyn ContractGateway {
        self.gateway.as_ref()
    }

    pub fn wallet(&self) -> &dyn WalletSession {
        self.wallet.as_ref()
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn contract_address(&self) -> Address {
        self.gateway.contract_address()
    }

    /// Initialize encryption with the wallet's provider.
    ///
    /// Also serves as the manual retry after a failure.
    pub async fn initialize_encryption(&self) -> ClientResult<()> {
        if let Some(provider) = self.wallet.provider() {
            self.encryption.attach_provider(provider);
        } else {
            debug!("No wallet provider to attach");
        }

        if let Err(e) = self.encryption.initialize().await {
            let message = self
                .encryption
                .error_message()
                .unwrap_or_else(|| e.to_string());
            self.notices.error("Encryption Unavailable", message);
            return Err(e.into());
        }
        Ok(())
    }

    /// Donation wizard for one campaign
    pub fn donate(&self, campaign_id: CampaignId, title: impl Into<String>) -> DonationFlow {
        DonationFlow::new(self.clone(), campaign_id, title)
    }

    pub fn campaign(&self, id: CampaignId) -> CampaignView {
        CampaignView::new(self.clone(), id)
    }

    pub fn board(&self) -> CampaignBoard {
        CampaignBoard::new(self.clone())
    }

    pub fn composer(&self) -> CampaignComposer {
        CampaignComposer::new(self.clone())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("encryption", &self.encryption.state())
            .field("contract", &self.gateway.contract_address())
            .field("account", &self.wallet.account())
            .finish()
    }
}
