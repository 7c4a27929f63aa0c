//! Campaign board: every campaign plus platform counters

use cipherkind_gateway::{GatewayError, PlatformStats};
use tracing::{info, warn};

use crate::campaign::{CampaignView, DEFAULT_TARGET_CENTS};
use crate::errors::{ClientError, ClientResult};
use crate::session::Session;

/// Shown when the contract has no campaigns
pub const EMPTY_MESSAGE: &str = "No campaigns available yet. Check back soon.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardState {
    Loading,
    Empty,
    Ready,
}

pub struct CampaignBoard {
    session: Session,
    state: BoardState,
    views: Vec<CampaignView>,
    stats: Option<PlatformStats>,
    target_cents: u64,
}

impl CampaignBoard {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            state: BoardState::Loading,
            views: Vec::new(),
            stats: None,
            target_cents: DEFAULT_TARGET_CENTS,
        }
    }

    /// Progress target applied to every card
    pub fn with_target(mut self, target_cents: u64) -> Self {
        self.target_cents = target_cents;
        self
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn views(&self) -> &[CampaignView] {
        &self.views
    }

    pub fn stats(&self) -> Option<PlatformStats> {
        self.stats
    }

    /// Fetch the campaign list and refresh every campaign
    pub async fn load(&mut self) -> ClientResult<()> {
        let gateway = self.session.gateway();

        let ids = match gateway.list_campaigns().await {
            Ok(ids) => ids,
            Err(e) => {
                self.session
                    .notices()
                    .error("Failed to load campaigns", e.to_string());
                return Err(e.into());
            }
        };

        self.stats = match gateway.platform_stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(error = %e, "Platform stats unavailable");
                None
            }
        };

        let mut views = Vec::with_capacity(ids.len());
        for id in ids {
            let mut view = self.session.campaign(id).with_target(self.target_cents);
            match view.refresh().await {
                Ok(()) => views.push(view),
                // Listed but gone: skip rather than fail the board
                Err(ClientError::Gateway(GatewayError::NotFound(_))) => {
                    warn!(campaign = %id.short(), "Listed campaign not found");
                }
                Err(e) => return Err(e),
            }
        }

        self.state = if views.is_empty() {
            BoardState::Empty
        } else {
            BoardState::Ready
        };
        self.views = views;

        info!(campaigns = self.views.len(), "Campaign board loaded");
        Ok(())
    }

    /// Retry decryption on every card
    pub async fn decrypt_all(&mut self) {
        for view in &mut self.views {
            view.try_decrypt().await;
        }
    }

    pub fn render(&self) -> String {
        match self.state {
            BoardState::Loading => "Loading campaigns...".to_string(),
            BoardState::Empty => EMPTY_MESSAGE.to_string(),
            BoardState::Ready => {
                let mut out = String::new();
                if let Some(stats) = self.stats {
                    out.push_str(&format!(
                        "{} campaigns ({} active), {} private donations\n\n",
                        stats.total_campaigns, stats.active_campaigns, stats.total_donations
                    ));
                }
                let cards: Vec<String> = self.views.iter().map(|v| v.render()).collect();
                out.push_str(&cards.join("\n\n"));
                out
            }
        }
    }
}
