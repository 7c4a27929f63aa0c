//! Contract gateway
//!
//! Typed reads and writes against the donation contract. The gateway moves
//! encrypted values as opaque bytes and never caches or retries: a failed
//! write is resubmitted by the caller with freshly encrypted data.

use async_trait::async_trait;
use cipherkind_primitives::{encode_handle_hex, encode_hex, Address, CampaignId, TxHash};
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use tracing::{debug, info, warn};

use crate::api::CampaignApiClient;
use crate::errors::{GatewayError, GatewayResult};
use crate::types::{Campaign, EncryptedAggregate, PlatformStats, TxReceipt};

/// Remote operations on the donation contract
#[async_trait]
pub trait ContractGateway: Send + Sync {
    /// Address encrypted inputs must be bound to
    fn contract_address(&self) -> Address;

    /// Campaign ids in creation order; empty is valid
    async fn list_campaigns(&self) -> GatewayResult<Vec<CampaignId>>;

    async fn get_campaign(&self, id: &CampaignId) -> GatewayResult<Campaign>;

    async fn get_encrypted_aggregate(&self, id: &CampaignId) -> GatewayResult<EncryptedAggregate>;

    async fn platform_stats(&self) -> GatewayResult<PlatformStats>;

    /// Submit an encrypted donation.
    ///
    /// `encrypted_amount` and `proof` must be the exact encryption output for
    /// this contract and `from`.
    async fn submit_donation(
        &self,
        from: &Address,
        campaign_id: &CampaignId,
        encrypted_amount: &[u8],
        proof: &[u8],
    ) -> GatewayResult<TxHash>;

    /// Submit a campaign with an encrypted target
    async fn submit_campaign_creation(
        &self,
        from: &Address,
        title: &str,
        description: &str,
        encrypted_target: &[u8],
        proof: &[u8],
    ) -> GatewayResult<TxHash>;

    async fn transaction_receipt(&self, tx_hash: &TxHash) -> GatewayResult<Option<TxReceipt>>;
}

/// Render an encrypted value and its proof as call arguments
pub fn encrypted_call_args(handle: &[u8], proof: &[u8]) -> (String, String) {
    (encode_handle_hex(handle), encode_hex(proof))
}

/// [`ContractGateway`] over JSON-RPC/HTTP
pub struct RpcGateway {
    client: HttpClient,
    contract: Address,
    url: String,
}

impl RpcGateway {
    /// Gateway for a known contract address
    pub fn new(url: &str, contract: Address) -> GatewayResult<Self> {
        let client = HttpClientBuilder::default()
            .build(url)
            .map_err(|e| GatewayError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            contract,
            url: url.to_string(),
        })
    }

    /// Gateway for whatever contract the endpoint serves
    pub async fn discover(url: &str) -> GatewayResult<Self> {
        let mut gateway = Self::new(url, Address::ZERO)?;
        gateway.contract = CampaignApiClient::contract_address(&gateway.client).await?;
        info!(url, contract = %gateway.contract, "Contract discovered");
        Ok(gateway)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ContractGateway for RpcGateway {
    fn contract_address(&self) -> Address {
        self.contract
    }

    async fn list_campaigns(&self) -> GatewayResult<Vec<CampaignId>> {
        let ids = CampaignApiClient::get_all_campaigns(&self.client).await?;
        debug!(count = ids.len(), "Fetched campaign ids");
        Ok(ids)
    }

    async fn get_campaign(&self, id: &CampaignId) -> GatewayResult<Campaign> {
        let campaign = CampaignApiClient::get_campaign(&self.client, *id).await?;
        if &campaign.id != id {
            return Err(GatewayError::InvalidResponse(format!(
                "asked for campaign {}, got {}",
                id.short(),
                campaign.id.short()
            )));
        }
        Ok(campaign)
    }

    async fn get_encrypted_aggregate(&self, id: &CampaignId) -> GatewayResult<EncryptedAggregate> {
        let handle = CampaignApiClient::get_campaign_encrypted_data(&self.client, *id).await?;
        Ok(EncryptedAggregate {
            campaign_id: *id,
            encrypted_total_raised: handle,
        })
    }

    async fn platform_stats(&self) -> GatewayResult<PlatformStats> {
        Ok(CampaignApiClient::get_platform_stats(&self.client).await?)
    }

    async fn submit_donation(
        &self,
        from: &Address,
        campaign_id: &CampaignId,
        encrypted_amount: &[u8],
        proof: &[u8],
    ) -> GatewayResult<TxHash> {
        let (handle, proof) = encrypted_call_args(encrypted_amount, proof);

        debug!(
            campaign = %campaign_id.short(),
            from = %from,
            proof_size = proof.len(),
            "Submitting donation"
        );

        let tx = CampaignApiClient::make_donation(&self.client, *from, *campaign_id, handle, proof)
            .await
            .map_err(|e| {
                let err = GatewayError::from(e);
                warn!(campaign = %campaign_id.short(), error = %err, "Donation rejected");
                err
            })?;

        info!(tx = %tx.short(), campaign = %campaign_id.short(), "Donation submitted");
        Ok(tx)
    }

    async fn submit_campaign_creation(
        &self,
        from: &Address,
        title: &str,
        description: &str,
        encrypted_target: &[u8],
        proof: &[u8],
    ) -> GatewayResult<TxHash> {
        let (handle, proof) = encrypted_call_args(encrypted_target, proof);

        let tx = CampaignApiClient::create_campaign(
            &self.client,
            *from,
            title.to_string(),
            description.to_string(),
            handle,
            proof,
        )
        .await?;

        info!(tx = %tx.short(), title, "Campaign creation submitted");
        Ok(tx)
    }

    async fn transaction_receipt(&self, tx_hash: &TxHash) -> GatewayResult<Option<TxReceipt>> {
        Ok(CampaignApiClient::get_transaction_receipt(&self.client, *tx_hash).await?)
    }
}

impl std::fmt::Debug for RpcGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcGateway")
            .field("url", &self.url)
            .field("contract", &self.contract)
            .finish()
    }
}
