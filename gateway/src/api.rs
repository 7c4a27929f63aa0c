//! Contract call surface
//!
//! Defines the JSON-RPC API using jsonrpsee macros. Encrypted arguments travel
//! as `0x` hex strings: handles are always 66 characters, proofs are
//! variable-length.

use cipherkind_primitives::{Address, CampaignId, CiphertextHandle, TxHash};
use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;

use crate::types::*;

/// Donation contract API
///
/// All methods are prefixed with `cipherkind_` namespace.
#[rpc(server, client, namespace = "cipherkind")]
pub trait CampaignApi {
    // =========== Reads ===========

    /// Address of the deployed contract
    #[method(name = "contractAddress")]
    async fn contract_address(&self) -> RpcResult<Address>;

    /// Campaign ids in creation order
    #[method(name = "getAllCampaigns")]
    async fn get_all_campaigns(&self) -> RpcResult<Vec<CampaignId>>;

    #[method(name = "getCampaign")]
    async fn get_campaign(&self, id: CampaignId) -> RpcResult<Campaign>;

    /// Handle of the encrypted total raised
    #[method(name = "getCampaignEncryptedData")]
    async fn get_campaign_encrypted_data(&self, id: CampaignId) -> RpcResult<CiphertextHandle>;

    #[method(name = "getPlatformStats")]
    async fn get_platform_stats(&self) -> RpcResult<PlatformStats>;

    #[method(name = "getTransactionReceipt")]
    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> RpcResult<Option<TxReceipt>>;

    // =========== Writes ===========

    /// Create a campaign with an encrypted target
    #[method(name = "createCampaign")]
    async fn create_campaign(
        &self,
        from: Address,
        title: String,
        description: String,
        encrypted_target: String,
        proof: String,
    ) -> RpcResult<TxHash>;

    /// Donate an encrypted amount
    #[method(name = "makeDonation")]
    async fn make_donation(
        &self,
        from: Address,
        campaign_id: CampaignId,
        encrypted_amount: String,
        proof: String,
    ) -> RpcResult<TxHash>;
}
