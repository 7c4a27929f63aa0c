//! Donation wizard
//!
//! ```text
//! AmountEntry(1) ──encrypt──▶ WalletConnect(2) ──continue──▶ Confirm(3)
//!       ▲                          │ account changed              │
//!       └──────────────────────────┘                              │
//!       └───────────────── submit succeeded ──────────────────────┘
//! ```
//!
//! The amount is encrypted for the connected account at step 1. Submission
//! consumes the encrypted payload; a failed submission stays at step 3 and the
//! next attempt re-encrypts.

use cipherkind_fhe::EncryptedInput;
use cipherkind_primitives::{Address, CampaignId, TxHash};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::amount::Amount;
use crate::errors::{ClientError, ClientResult, ValidationError};
use crate::session::Session;

/// Characters of the handle shown as the encrypted preview
const PREVIEW_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DonationStep {
    AmountEntry,
    WalletConnect,
    Confirm,
}

impl DonationStep {
    /// 1-based position in the wizard
    pub fn number(self) -> u8 {
        match self {
            DonationStep::AmountEntry => 1,
            DonationStep::WalletConnect => 2,
            DonationStep::Confirm => 3,
        }
    }
}

/// Encrypted amount bound to the account it was produced for
struct PreparedDonation {
    account: Address,
    amount: Amount,
    input: EncryptedInput,
}

/// Three-step donation wizard for one campaign
pub struct DonationFlow {
    session: Session,
    campaign_id: CampaignId,
    title: String,
    step: DonationStep,
    amount: String,
    preview: String,
    prepared: Option<PreparedDonation>,
    last_error: Option<ClientError>,
}

impl DonationFlow {
    pub fn new(session: Session, campaign_id: CampaignId, title: impl Into<String>) -> Self {
        Self {
            session,
            campaign_id,
            title: title.into(),
            step: DonationStep::AmountEntry,
            amount: String::new(),
            preview: String::new(),
            prepared: None,
            last_error: None,
        }
    }

    pub fn step(&self) -> DonationStep {
        self.step
    }

    pub fn campaign_id(&self) -> CampaignId {
        self.campaign_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Raw amount as typed
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Truncated handle of the encrypted amount, empty before encryption
    pub fn encrypted_preview(&self) -> &str {
        &self.preview
    }

    /// Error shown inline, if the last action failed
    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    /// Whether the submit action is available
    pub fn can_submit(&self) -> bool {
        self.step == DonationStep::Confirm
            && self.session.encryption().is_ready()
            && self.session.wallet().is_connected()
    }

    /// Edit the amount (step 1 only)
    pub fn set_amount(&mut self, value: &str) -> ClientResult<()> {
        self.require(DonationStep::AmountEntry)?;
        self.amount = value.to_string();
        self.last_error = None;
        Ok(())
    }

    /// Step 1 → 2: validate and encrypt the amount
    pub async fn encrypt(&mut self) -> ClientResult<()> {
        self.require(DonationStep::AmountEntry)?;

        let result = self.prepare().await;
        match result {
            Ok(prepared) => {
                self.preview = preview_of(&prepared.input);
                debug!(
                    campaign = %self.campaign_id.short(),
                    preview = %self.preview,
                    "Donation amount encrypted"
                );
                self.prepared = Some(prepared);
                self.step = DonationStep::WalletConnect;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                if !matches!(e, ClientError::Validation(_)) {
                    self.session.notices().error("Encryption Failed", e.to_string());
                }
                Err(self.fail(e))
            }
        }
    }

    /// Step 2 → 3: confirm the wallet is connected to the same account
    pub fn continue_to_confirm(&mut self) -> ClientResult<()> {
        self.require(DonationStep::WalletConnect)?;

        let Some(account) = self.session.wallet().account() else {
            return Err(self.fail(ValidationError::WalletNotConnected.into()));
        };

        if self.prepared.as_ref().map(|p| p.account) != Some(account) {
            self.back_to_amount_entry();
            return Err(self.fail(ValidationError::AccountChanged.into()));
        }

        self.step = DonationStep::Confirm;
        self.last_error = None;
        self.session
            .notices()
            .success("Wallet Connected", "Your wallet has been connected successfully.");
        Ok(())
    }

    /// Step 3: submit the encrypted donation
    pub async fn submit(&mut self) -> ClientResult<TxHash> {
        self.require(DonationStep::Confirm)?;

        let Some(account) = self.session.wallet().account() else {
            return Err(self.fail(ValidationError::WalletNotConnected.into()));
        };

        let prepared = match self.prepared.take() {
            Some(prepared) if prepared.account == account => prepared,
            Some(_) => {
                self.back_to_amount_entry();
                return Err(self.fail(ValidationError::AccountChanged.into()));
            }
            // Previous attempt consumed the payload
            None => match self.prepare().await {
                Ok(prepared) => {
                    self.preview = preview_of(&prepared.input);
                    prepared
                }
                Err(e) => return Err(self.fail(e)),
            },
        };

        let result = self
            .session
            .gateway()
            .submit_donation(
                &prepared.account,
                &self.campaign_id,
                &prepared.input.handles[0],
                &prepared.input.input_proof,
            )
            .await;

        match result {
            Ok(tx) => {
                info!(
                    tx = %tx.short(),
                    campaign = %self.campaign_id.short(),
                    "Donation submitted"
                );
                self.session.notices().success(
                    "Donation Submitted Successfully",
                    format!(
                        "Your encrypted donation has been securely stored on the blockchain. Transaction hash: {}",
                        tx
                    ),
                );
                self.reset();
                Ok(tx)
            }
            Err(e) => {
                warn!(campaign = %self.campaign_id.short(), error = %e, "Donation failed");
                self.session.notices().error(
                    "Donation Failed",
                    "There was an error submitting your donation. Please try again.",
                );
                Err(self.fail(e.into()))
            }
        }
    }

    /// Back to an empty step 1
    pub fn reset(&mut self) {
        self.step = DonationStep::AmountEntry;
        self.amount.clear();
        self.preview.clear();
        self.prepared = None;
        self.last_error = None;
    }

    async fn prepare(&self) -> ClientResult<PreparedDonation> {
        let amount = Amount::parse(&self.amount)?;
        let account = self
            .session
            .wallet()
            .account()
            .ok_or(ValidationError::WalletNotConnected)?;

        let mut builder = self
            .session
            .encryption()
            .create_encrypted_input(self.session.contract_address(), account)?;
        builder.add32(amount.cents());
        let input = builder.encrypt().await?;

        Ok(PreparedDonation {
            account,
            amount,
            input,
        })
    }

    fn back_to_amount_entry(&mut self) {
        self.step = DonationStep::AmountEntry;
        self.preview.clear();
        self.prepared = None;
    }

    fn require(&self, step: DonationStep) -> ClientResult<()> {
        if self.step != step {
            return Err(ClientError::InvalidStep(self.step.number()));
        }
        Ok(())
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        self.last_error = Some(err.clone());
        err
    }

    /// Amount of the prepared payload, if any
    pub fn prepared_amount(&self) -> Option<Amount> {
        self.prepared.as_ref().map(|p| p.amount)
    }
}

fn preview_of(input: &EncryptedInput) -> String {
    let hex = input.handle_hex(0).unwrap_or_default();
    format!("{}...", &hex[..PREVIEW_LEN.min(hex.len())])
}
