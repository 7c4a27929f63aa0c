//! In-process gateway onto a devnet chain

use std::sync::Arc;

use async_trait::async_trait;
use cipherkind_gateway::{
    Campaign, ContractGateway, EncryptedAggregate, GatewayResult, PlatformStats, TxReceipt,
};
use cipherkind_primitives::{normalize_handle, Address, CampaignId, TxHash};

use crate::chain::DevnetChain;

/// [`ContractGateway`] calling the chain directly, with the same handle
/// normalization the RPC gateway applies on the wire
#[derive(Debug, Clone)]
pub struct LocalGateway {
    chain: Arc<DevnetChain>,
}

impl LocalGateway {
    pub fn new(chain: Arc<DevnetChain>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl ContractGateway for LocalGateway {
    fn contract_address(&self) -> Address {
        self.chain.contract_address()
    }

    async fn list_campaigns(&self) -> GatewayResult<Vec<CampaignId>> {
        Ok(self.chain.campaign_ids())
    }

    async fn get_campaign(&self, id: &CampaignId) -> GatewayResult<Campaign> {
        Ok(self.chain.campaign(id)?)
    }

    async fn get_encrypted_aggregate(&self, id: &CampaignId) -> GatewayResult<EncryptedAggregate> {
        Ok(EncryptedAggregate {
            campaign_id: *id,
            encrypted_total_raised: self.chain.encrypted_total(id)?,
        })
    }

    async fn platform_stats(&self) -> GatewayResult<PlatformStats> {
        Ok(self.chain.platform_stats())
    }

    async fn submit_donation(
        &self,
        from: &Address,
        campaign_id: &CampaignId,
        encrypted_amount: &[u8],
        proof: &[u8],
    ) -> GatewayResult<TxHash> {
        Ok(self
            .chain
            .make_donation(*from, *campaign_id, normalize_handle(encrypted_amount), proof)
            .await?)
    }

    async fn submit_campaign_creation(
        &self,
        from: &Address,
        title: &str,
        description: &str,
        encrypted_target: &[u8],
        proof: &[u8],
    ) -> GatewayResult<TxHash> {
        Ok(self
            .chain
            .create_campaign(*from, title, description, normalize_handle(encrypted_target), proof)
            .await?)
    }

    async fn transaction_receipt(&self, tx_hash: &TxHash) -> GatewayResult<Option<TxReceipt>> {
        Ok(self.chain.receipt(tx_hash))
    }
}
