//! Contract records as returned over RPC

use cipherkind_primitives::{Address, CampaignId, CiphertextHandle, TxHash};
use serde::{Deserialize, Serialize};

/// Campaign record.
///
/// Owned by the contract; the client only ever replaces a fetched copy with a
/// fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// Campaign identifier
    pub id: CampaignId,
    /// Account that created the campaign
    pub creator: Address,
    pub title: String,
    pub description: String,
    /// Whether the campaign still accepts donations
    pub is_active: bool,
    /// Creation time (unix seconds)
    pub created_at: u64,
    /// Completion time (unix seconds), if completed
    pub completed_at: Option<u64>,
    /// Number of donations received
    pub donor_count: u64,
}

/// Encrypted running total of a campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedAggregate {
    pub campaign_id: CampaignId,
    /// Handle of the encrypted total, in cents
    pub encrypted_total_raised: CiphertextHandle,
}

/// Platform-wide counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_campaigns: u64,
    pub active_campaigns: u64,
    pub total_donations: u64,
}

/// Events emitted by the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ContractEvent {
    #[serde(rename_all = "camelCase")]
    CampaignCreated {
        campaign_id: CampaignId,
        creator: Address,
        title: String,
    },
    #[serde(rename_all = "camelCase")]
    DonationMade {
        campaign_id: CampaignId,
        donor: Address,
    },
}

/// Receipt of an executed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    /// Sender
    pub from: Address,
    /// Block the transaction was included in
    pub block_number: u64,
    pub events: Vec<ContractEvent>,
}

impl TxReceipt {
    /// Id of the campaign created by this transaction, if any
    pub fn created_campaign(&self) -> Option<CampaignId> {
        self.events.iter().find_map(|event| match event {
            ContractEvent::CampaignCreated { campaign_id, .. } => Some(*campaign_id),
            _ => None,
        })
    }
}
