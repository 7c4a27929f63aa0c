//! Devnet RPC Server
//!
//! Serves the contract (`cipherkind_` namespace) and the relayer (`relayer_`
//! namespace) from one HTTP endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use cipherkind_fhe::{RelayerApiServer, RelayerTransport};
use cipherkind_gateway::{Campaign, CampaignApiServer, PlatformStats, TxReceipt};
use cipherkind_primitives::{
    decode_hex, encode_hex, Address, CampaignId, CiphertextHandle, TxHash,
};
use jsonrpsee::core::{async_trait, RpcResult};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use tracing::{info, warn};

use crate::chain::DevnetChain;
use crate::errors::{DevnetError, DevnetResult};

/// RPC server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP bind address
    pub http_addr: SocketAddr,
    /// Maximum request size in bytes
    pub max_request_size: u32,
    /// Maximum response size in bytes
    pub max_response_size: u32,
    /// Maximum concurrent connections
    pub max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([127, 0, 0, 1], cipherkind_gateway::DEFAULT_RPC_PORT)),
            max_request_size: 10 * 1024 * 1024, // 10MB
            max_response_size: 10 * 1024 * 1024,
            max_connections: 100,
        }
    }
}

impl ServerConfig {
    /// Bind to `addr`
    pub fn at(addr: SocketAddr) -> Self {
        Self {
            http_addr: addr,
            ..Default::default()
        }
    }

    /// Any free local port
    pub fn ephemeral() -> Self {
        Self::at(SocketAddr::from(([127, 0, 0, 1], 0)))
    }
}

/// The devnet RPC server
pub struct DevnetServer {
    config: ServerConfig,
    chain: Arc<DevnetChain>,
    handle: Option<ServerHandle>,
    local_addr: Option<SocketAddr>,
}

impl DevnetServer {
    pub fn new(config: ServerConfig, chain: Arc<DevnetChain>) -> Self {
        Self {
            config,
            chain,
            handle: None,
            local_addr: None,
        }
    }

    /// Start serving; returns the bound address
    pub async fn start(&mut self) -> DevnetResult<SocketAddr> {
        let server = Server::builder()
            .max_request_body_size(self.config.max_request_size)
            .max_response_body_size(self.config.max_response_size)
            .max_connections(self.config.max_connections)
            .build(self.config.http_addr)
            .await
            .map_err(|e| DevnetError::ServerError(e.to_string()))?;

        let addr = server
            .local_addr()
            .map_err(|e| DevnetError::ServerError(e.to_string()))?;

        let module = ApiHandler {
            chain: self.chain.clone(),
        }
        .into_rpc()?;

        info!(%addr, contract = %self.chain.contract_address(), "Starting devnet RPC server");

        self.handle = Some(server.start(module));
        self.local_addr = Some(addr);
        Ok(addr)
    }

    /// Stop the server
    pub fn stop(&mut self) -> DevnetResult<()> {
        if let Some(handle) = self.handle.take() {
            info!("Stopping devnet RPC server");
            handle
                .stop()
                .map_err(|e| DevnetError::ServerError(format!("{:?}", e)))?;
        }
        Ok(())
    }

    /// Wait until the server has stopped
    pub async fn stopped(&self) {
        if let Some(handle) = &self.handle {
            handle.clone().stopped().await;
        }
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// `http://` URL of the running server
    pub fn url(&self) -> Option<String> {
        self.local_addr.map(|addr| format!("http://{addr}"))
    }

    pub fn chain(&self) -> &Arc<DevnetChain> {
        &self.chain
    }
}

/// Handler implementing both RPC traits
#[derive(Clone)]
struct ApiHandler {
    chain: Arc<DevnetChain>,
}

impl ApiHandler {
    fn into_rpc(self) -> DevnetResult<RpcModule<()>> {
        let mut module = RpcModule::new(());

        module
            .merge(CampaignApiServer::into_rpc(self.clone()))
            .map_err(|e| DevnetError::ServerError(e.to_string()))?;
        module
            .merge(RelayerApiServer::into_rpc(self))
            .map_err(|e| DevnetError::ServerError(e.to_string()))?;

        Ok(module)
    }

    fn parse_handle(value: &str) -> Result<CiphertextHandle, DevnetError> {
        CiphertextHandle::from_hex(value)
            .map_err(|e| DevnetError::InvalidParams(format!("encrypted value: {e}")))
    }

    fn parse_proof(value: &str) -> Result<Vec<u8>, DevnetError> {
        decode_hex(value).map_err(|e| DevnetError::InvalidParams(format!("proof: {e}")))
    }
}

#[async_trait]
impl CampaignApiServer for ApiHandler {
    async fn contract_address(&self) -> RpcResult<Address> {
        Ok(self.chain.contract_address())
    }

    async fn get_all_campaigns(&self) -> RpcResult<Vec<CampaignId>> {
        Ok(self.chain.campaign_ids())
    }

    async fn get_campaign(&self, id: CampaignId) -> RpcResult<Campaign> {
        Ok(self.chain.campaign(&id)?)
    }

    async fn get_campaign_encrypted_data(&self, id: CampaignId) -> RpcResult<CiphertextHandle> {
        Ok(self.chain.encrypted_total(&id)?)
    }

    async fn get_platform_stats(&self) -> RpcResult<PlatformStats> {
        Ok(self.chain.platform_stats())
    }

    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> RpcResult<Option<TxReceipt>> {
        Ok(self.chain.receipt(&tx_hash))
    }

    async fn create_campaign(
        &self,
        from: Address,
        title: String,
        description: String,
        encrypted_target: String,
        proof: String,
    ) -> RpcResult<TxHash> {
        let handle = Self::parse_handle(&encrypted_target)?;
        let proof = Self::parse_proof(&proof)?;

        self.chain
            .create_campaign(from, &title, &description, handle, &proof)
            .await
            .map_err(|e| {
                warn!(error = %e, "createCampaign reverted");
                e.into()
            })
    }

    async fn make_donation(
        &self,
        from: Address,
        campaign_id: CampaignId,
        encrypted_amount: String,
        proof: String,
    ) -> RpcResult<TxHash> {
        let handle = Self::parse_handle(&encrypted_amount)?;
        let proof = Self::parse_proof(&proof)?;

        self.chain
            .make_donation(from, campaign_id, handle, &proof)
            .await
            .map_err(|e| {
                warn!(error = %e, "makeDonation reverted");
                e.into()
            })
    }
}

#[async_trait]
impl RelayerApiServer for ApiHandler {
    async fn chain_id(&self) -> RpcResult<u64> {
        Ok(self.chain.chain_id())
    }

    async fn public_key(&self) -> RpcResult<String> {
        Ok(encode_hex(&RelayerTransport::public_key(&*self.chain).await?))
    }

    async fn user_decrypt(
        &self,
        handle: CiphertextHandle,
        contract: Address,
        user: Address,
    ) -> RpcResult<Option<u64>> {
        Ok(RelayerTransport::user_decrypt(&*self.chain, &handle, &contract, &user).await?)
    }
}
