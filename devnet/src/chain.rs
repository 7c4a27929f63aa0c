//! Devnet contract state
//!
//! Executes the donation contract against real TFHE ciphertexts:
//!
//! - `createCampaign` expands the encrypted target and opens a zero total
//! - `makeDonation` expands the encrypted amount and adds it to the total
//! - every computed ciphertext gets a fresh handle and an ACL entry
//!
//! Transactions execute one at a time; each is mined into its own block.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use cipherkind_fhe::{
    FheError, FheResult, InputProof, NetworkKeys, RelayerTransport, RpcProvider,
};
use cipherkind_gateway::{Campaign, ContractEvent, PlatformStats, TxReceipt};
use cipherkind_primitives::{Address, Bytes32, CampaignId, CiphertextHandle, TxHash};
use parking_lot::RwLock;
use tfhe::prelude::*;
use tfhe::FheUint32;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::{DevnetError, DevnetResult};

/// Chain id of a local network
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// Endpoint reported by in-process providers
pub const IN_PROCESS_ENDPOINT: &str = "devnet://in-process";

const CONTRACT_DOMAIN: &str = "cipherkind.devnet.contract.v1";
const COMPUTED_DOMAIN: &str = "cipherkind.devnet.computed.v1";

/// Devnet configuration
#[derive(Debug, Clone)]
pub struct DevnetConfig {
    pub chain_id: u64,
}

impl Default for DevnetConfig {
    fn default() -> Self {
        Self {
            chain_id: LOCAL_CHAIN_ID,
        }
    }
}

/// Contract address a devnet deploys to; fixed per chain id
pub fn devnet_contract_address(chain_id: u64) -> Address {
    let mut hasher = blake3::Hasher::new_derive_key(CONTRACT_DOMAIN);
    hasher.update(&chain_id.to_le_bytes());
    let mut address = [0u8; 20];
    address.copy_from_slice(&hasher.finalize().as_bytes()[..20]);
    Address::new(address)
}

struct CampaignRecord {
    campaign: Campaign,
    target: CiphertextHandle,
    total: CiphertextHandle,
}

#[derive(Default)]
struct ChainState {
    order: Vec<CampaignId>,
    campaigns: HashMap<CampaignId, CampaignRecord>,
    ciphertexts: HashMap<CiphertextHandle, FheUint32>,
    acl: HashMap<CiphertextHandle, HashSet<Address>>,
    consumed_inputs: HashSet<CiphertextHandle>,
    receipts: HashMap<TxHash, TxReceipt>,
    block_number: u64,
    nonce: u64,
    total_donations: u64,
}

impl ChainState {
    fn store(&mut self, handle: CiphertextHandle, value: FheUint32, reader: Address) {
        self.ciphertexts.insert(handle, value);
        self.acl.entry(handle).or_default().insert(reader);
    }

    fn drop_ciphertext(&mut self, handle: &CiphertextHandle) {
        self.ciphertexts.remove(handle);
        self.acl.remove(handle);
    }

    fn mine(&mut self, tx_hash: TxHash, from: Address, events: Vec<ContractEvent>) {
        self.block_number += 1;
        self.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                from,
                block_number: self.block_number,
                events,
            },
        );
    }
}

/// Local donation contract with its relayer
pub struct DevnetChain {
    chain_id: u64,
    contract: Address,
    keys: Arc<NetworkKeys>,
    public_key: Vec<u8>,
    state: RwLock<ChainState>,
    executor: Mutex<()>,
}

impl DevnetChain {
    /// Create a chain around existing key material
    pub fn new(config: DevnetConfig, keys: Arc<NetworkKeys>) -> DevnetResult<Self> {
        let public_key = keys.public_key_bytes()?;
        let contract = devnet_contract_address(config.chain_id);

        info!(
            chain_id = config.chain_id,
            contract = %contract,
            public_key_size = public_key.len(),
            "Devnet contract deployed"
        );

        Ok(Self {
            chain_id: config.chain_id,
            contract,
            keys,
            public_key,
            state: RwLock::new(ChainState::default()),
            executor: Mutex::new(()),
        })
    }

    /// Generate fresh keys and create a chain (takes a few seconds)
    pub async fn generate(config: DevnetConfig) -> DevnetResult<Self> {
        info!("Generating network keys");
        let keys = tokio::task::spawn_blocking(NetworkKeys::generate)
            .await
            .map_err(|e| DevnetError::Execution(e.to_string()))?;
        Self::new(config, Arc::new(keys))
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn contract_address(&self) -> Address {
        self.contract
    }

    /// Provider handle for wallets connected to this chain in-process
    pub fn provider(&self) -> RpcProvider {
        RpcProvider::new(self.chain_id, IN_PROCESS_ENDPOINT)
    }

    pub fn block_number(&self) -> u64 {
        self.state.read().block_number
    }

    // =========== Reads ===========

    pub fn campaign_ids(&self) -> Vec<CampaignId> {
        self.state.read().order.clone()
    }

    pub fn campaign(&self, id: &CampaignId) -> DevnetResult<Campaign> {
        self.state
            .read()
            .campaigns
            .get(id)
            .map(|record| record.campaign.clone())
            .ok_or_else(|| DevnetError::CampaignNotFound(id.to_hex()))
    }

    pub fn encrypted_total(&self, id: &CampaignId) -> DevnetResult<CiphertextHandle> {
        self.state
            .read()
            .campaigns
            .get(id)
            .map(|record| record.total)
            .ok_or_else(|| DevnetError::CampaignNotFound(id.to_hex()))
    }

    /// Handle of the encrypted target
    pub fn encrypted_target(&self, id: &CampaignId) -> DevnetResult<CiphertextHandle> {
        self.state
            .read()
            .campaigns
            .get(id)
            .map(|record| record.target)
            .ok_or_else(|| DevnetError::CampaignNotFound(id.to_hex()))
    }

    pub fn platform_stats(&self) -> PlatformStats {
        let state = self.state.read();
        PlatformStats {
            total_campaigns: state.order.len() as u64,
            active_campaigns: state
                .campaigns
                .values()
                .filter(|record| record.campaign.is_active)
                .count() as u64,
            total_donations: state.total_donations,
        }
    }

    pub fn receipt(&self, tx_hash: &TxHash) -> Option<TxReceipt> {
        self.state.read().receipts.get(tx_hash).cloned()
    }

    // =========== Transactions ===========

    /// Create a campaign whose target is `encrypted_target`
    pub async fn create_campaign(
        &self,
        from: Address,
        title: &str,
        description: &str,
        encrypted_target: CiphertextHandle,
        proof: &[u8],
    ) -> DevnetResult<TxHash> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DevnetError::InvalidCampaign("title is empty".into()));
        }

        let proof = InputProof::from_bytes(proof)?;
        let index = proof.verify(&encrypted_target, &self.contract, &from)?;

        let _exec = self.executor.lock().await;
        self.ensure_unused(&encrypted_target)?;

        let keys = self.keys.clone();
        let (target, zero) = execute(move || {
            keys.install_server_key();
            let target = proof.expand_u32(index)?;
            let zero = FheUint32::encrypt(0u32, keys.client());
            Ok((target, zero))
        })
        .await?;

        let mut state = self.state.write();
        state.nonce += 1;
        let nonce = state.nonce;

        let id = self.derive(b"campaign", nonce);
        let total = self.derive(b"total", nonce);
        let tx_hash = self.derive(b"tx", nonce);

        state.store(encrypted_target, target, from);
        state.store(total, zero, from);
        state.consumed_inputs.insert(encrypted_target);

        state.order.push(id);
        state.campaigns.insert(
            id,
            CampaignRecord {
                campaign: Campaign {
                    id,
                    creator: from,
                    title: title.to_string(),
                    description: description.to_string(),
                    is_active: true,
                    created_at: now(),
                    completed_at: None,
                    donor_count: 0,
                },
                target: encrypted_target,
                total,
            },
        );

        state.mine(
            tx_hash,
            from,
            vec![ContractEvent::CampaignCreated {
                campaign_id: id,
                creator: from,
                title: title.to_string(),
            }],
        );

        info!(campaign = %id.short(), creator = %from, title, "Campaign created");
        Ok(tx_hash)
    }

    /// Add `encrypted_amount` to the campaign's encrypted total
    pub async fn make_donation(
        &self,
        from: Address,
        campaign_id: CampaignId,
        encrypted_amount: CiphertextHandle,
        proof: &[u8],
    ) -> DevnetResult<TxHash> {
        let proof = InputProof::from_bytes(proof)?;
        let index = proof.verify(&encrypted_amount, &self.contract, &from)?;

        let _exec = self.executor.lock().await;
        self.ensure_unused(&encrypted_amount)?;

        let current = {
            let state = self.state.read();
            let record = state
                .campaigns
                .get(&campaign_id)
                .ok_or_else(|| DevnetError::CampaignNotFound(campaign_id.to_hex()))?;
            if !record.campaign.is_active {
                return Err(DevnetError::CampaignInactive(campaign_id.to_hex()));
            }
            state
                .ciphertexts
                .get(&record.total)
                .cloned()
                .ok_or_else(|| DevnetError::Execution("campaign total missing".into()))?
        };

        let keys = self.keys.clone();
        let (amount, new_total) = execute(move || {
            keys.install_server_key();
            let amount = proof.expand_u32(index)?;
            let new_total = &current + &amount;
            Ok((amount, new_total))
        })
        .await?;

        let mut state = self.state.write();
        state.nonce += 1;
        let nonce = state.nonce;
        let total = self.derive(b"total", nonce);
        let tx_hash = self.derive(b"tx", nonce);

        let (previous, creator) = match state.campaigns.get_mut(&campaign_id) {
            Some(record) => {
                record.campaign.donor_count += 1;
                let previous = std::mem::replace(&mut record.total, total);
                (previous, record.campaign.creator)
            }
            None => return Err(DevnetError::CampaignNotFound(campaign_id.to_hex())),
        };

        state.drop_ciphertext(&previous);
        state.store(total, new_total, creator);
        state.store(encrypted_amount, amount, from);
        state.consumed_inputs.insert(encrypted_amount);
        state.total_donations += 1;

        state.mine(
            tx_hash,
            from,
            vec![ContractEvent::DonationMade {
                campaign_id,
                donor: from,
            }],
        );

        info!(campaign = %campaign_id.short(), donor = %from, "Donation accepted");
        Ok(tx_hash)
    }

    /// Close a campaign; creator only
    pub async fn complete_campaign(
        &self,
        from: Address,
        campaign_id: CampaignId,
    ) -> DevnetResult<TxHash> {
        let _exec = self.executor.lock().await;

        let mut state = self.state.write();
        let record = state
            .campaigns
            .get_mut(&campaign_id)
            .ok_or_else(|| DevnetError::CampaignNotFound(campaign_id.to_hex()))?;

        if record.campaign.creator != from {
            return Err(DevnetError::NotCreator(from.to_hex()));
        }
        if !record.campaign.is_active {
            return Err(DevnetError::CampaignInactive(campaign_id.to_hex()));
        }

        record.campaign.is_active = false;
        record.campaign.completed_at = Some(now());

        state.nonce += 1;
        let tx_hash = self.derive(b"tx", state.nonce);
        state.mine(tx_hash, from, Vec::new());

        info!(campaign = %campaign_id.short(), "Campaign completed");
        Ok(tx_hash)
    }

    fn ensure_unused(&self, handle: &CiphertextHandle) -> DevnetResult<()> {
        if self.state.read().consumed_inputs.contains(handle) {
            warn!(handle = %handle.short(), "Replayed encrypted input");
            return Err(FheError::InvalidProof(format!("input {} already used", handle.short())).into());
        }
        Ok(())
    }

    fn derive(&self, tag: &[u8], nonce: u64) -> Bytes32 {
        let mut hasher = blake3::Hasher::new_derive_key(COMPUTED_DOMAIN);
        hasher.update(self.contract.as_bytes());
        hasher.update(tag);
        hasher.update(&nonce.to_le_bytes());
        Bytes32::new(*hasher.finalize().as_bytes())
    }
}

#[async_trait]
impl RelayerTransport for DevnetChain {
    async fn chain_id(&self) -> FheResult<u64> {
        Ok(self.chain_id)
    }

    async fn public_key(&self) -> FheResult<Vec<u8>> {
        Ok(self.public_key.clone())
    }

    async fn user_decrypt(
        &self,
        handle: &CiphertextHandle,
        contract: &Address,
        user: &Address,
    ) -> FheResult<Option<u64>> {
        if contract != &self.contract {
            return Err(FheError::DecryptionDenied(format!("unknown contract {contract}")));
        }

        let ciphertext = {
            let state = self.state.read();
            let Some(ciphertext) = state.ciphertexts.get(handle) else {
                debug!(handle = %handle.short(), "Decryption requested for unknown handle");
                return Ok(None);
            };
            let allowed = state
                .acl
                .get(handle)
                .map_or(false, |readers| readers.contains(user));
            if !allowed {
                return Err(FheError::DecryptionDenied(format!(
                    "{} may not decrypt {}",
                    user,
                    handle.short()
                )));
            }
            ciphertext.clone()
        };

        let keys = self.keys.clone();
        let value = tokio::task::spawn_blocking(move || -> u32 { ciphertext.decrypt(keys.client()) })
            .await
            .map_err(|e| FheError::DecryptionFailed(e.to_string()))?;

        debug!(handle = %handle.short(), user = %user, "User decryption served");
        Ok(Some(u64::from(value)))
    }
}

impl std::fmt::Debug for DevnetChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevnetChain")
            .field("chain_id", &self.chain_id)
            .field("contract", &self.contract)
            .field("block_number", &self.block_number())
            .finish()
    }
}

async fn execute<F, T>(f: F) -> DevnetResult<T>
where
    F: FnOnce() -> DevnetResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DevnetError::Execution(e.to_string()))?
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{chain, encrypt_cents};

    const ALICE: Address = Address([0xa1; 20]);
    const BOB: Address = Address([0xb0; 20]);

    async fn create(chain: &Arc<DevnetChain>, title: &str, target_cents: u32) -> CampaignId {
        let input = encrypt_cents(chain, ALICE, target_cents).await;
        let tx = chain
            .create_campaign(ALICE, title, "desc", input.handle(0).unwrap(), &input.input_proof)
            .await
            .unwrap();
        chain.receipt(&tx).unwrap().created_campaign().unwrap()
    }

    #[tokio::test]
    async fn test_donations_accumulate_for_creator() {
        let chain = chain();
        let id = create(&chain, "Clean Water Initiative", 10000).await;

        for cents in [2550, 1000] {
            let input = encrypt_cents(&chain, BOB, cents).await;
            chain
                .make_donation(BOB, id, input.handle(0).unwrap(), &input.input_proof)
                .await
                .unwrap();
        }

        let campaign = chain.campaign(&id).unwrap();
        assert_eq!(campaign.donor_count, 2);
        assert_eq!(campaign.creator, ALICE);

        let total = chain.encrypted_total(&id).unwrap();
        let clear = RelayerTransport::user_decrypt(&*chain, &total, &chain.contract_address(), &ALICE)
            .await
            .unwrap();
        assert_eq!(clear, Some(3550));

        let target = chain.encrypted_target(&id).unwrap();
        let clear = RelayerTransport::user_decrypt(&*chain, &target, &chain.contract_address(), &ALICE)
            .await
            .unwrap();
        assert_eq!(clear, Some(10000));
    }

    #[tokio::test]
    async fn test_total_hidden_from_donor() {
        let chain = chain();
        let id = create(&chain, "Education for All", 15000).await;
        let total = chain.encrypted_total(&id).unwrap();

        let err = RelayerTransport::user_decrypt(&*chain, &total, &chain.contract_address(), &BOB)
            .await
            .unwrap_err();
        assert!(matches!(err, FheError::DecryptionDenied(_)));

        let unknown = RelayerTransport::user_decrypt(
            &*chain,
            &CiphertextHandle::new([7; 32]),
            &chain.contract_address(),
            &ALICE,
        )
        .await
        .unwrap();
        assert_eq!(unknown, None);
    }

    #[tokio::test]
    async fn test_replayed_and_misbound_inputs_rejected() {
        let chain = chain();
        let id = create(&chain, "Climate Action Fund", 20000).await;

        let input = encrypt_cents(&chain, BOB, 500).await;
        let handle = input.handle(0).unwrap();

        // Bound to BOB, submitted by ALICE
        let err = chain
            .make_donation(ALICE, id, handle, &input.input_proof)
            .await
            .unwrap_err();
        assert!(matches!(err, DevnetError::Fhe(FheError::InvalidProof(_))));

        chain.make_donation(BOB, id, handle, &input.input_proof).await.unwrap();
        let err = chain
            .make_donation(BOB, id, handle, &input.input_proof)
            .await
            .unwrap_err();
        assert!(matches!(err, DevnetError::Fhe(FheError::InvalidProof(_))));

        assert_eq!(chain.campaign(&id).unwrap().donor_count, 1);
    }

    #[tokio::test]
    async fn test_unknown_and_completed_campaigns() {
        let chain = chain();
        let input = encrypt_cents(&chain, BOB, 100).await;

        let err = chain
            .make_donation(BOB, CampaignId::new([1; 32]), input.handle(0).unwrap(), &input.input_proof)
            .await
            .unwrap_err();
        assert!(matches!(err, DevnetError::CampaignNotFound(_)));

        let id = create(&chain, "Books", 1000).await;
        assert!(matches!(
            chain.complete_campaign(BOB, id).await,
            Err(DevnetError::NotCreator(_))
        ));
        chain.complete_campaign(ALICE, id).await.unwrap();

        let campaign = chain.campaign(&id).unwrap();
        assert!(!campaign.is_active);
        assert!(campaign.completed_at.is_some());

        let err = chain
            .make_donation(BOB, id, input.handle(0).unwrap(), &input.input_proof)
            .await
            .unwrap_err();
        assert!(matches!(err, DevnetError::CampaignInactive(_)));
    }

    #[tokio::test]
    async fn test_stats_and_ordering() {
        let chain = chain();
        assert!(chain.campaign_ids().is_empty());
        assert_eq!(chain.platform_stats(), PlatformStats::default());

        let first = create(&chain, "First", 100).await;
        let second = create(&chain, "Second", 200).await;
        assert_eq!(chain.campaign_ids(), vec![first, second]);

        let input = encrypt_cents(&chain, BOB, 50).await;
        chain
            .make_donation(BOB, second, input.handle(0).unwrap(), &input.input_proof)
            .await
            .unwrap();
        chain.complete_campaign(ALICE, first).await.unwrap();

        assert_eq!(
            chain.platform_stats(),
            PlatformStats {
                total_campaigns: 2,
                active_campaigns: 1,
                total_donations: 1,
            }
        );
        assert_eq!(chain.block_number(), 4);
    }

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let chain = chain();
        let input = encrypt_cents(&chain, ALICE, 100).await;
        let err = chain
            .create_campaign(ALICE, "   ", "d", input.handle(0).unwrap(), &input.input_proof)
            .await
            .unwrap_err();
        assert!(matches!(err, DevnetError::InvalidCampaign(_)));
    }

    #[test]
    fn test_contract_address_is_stable() {
        assert_eq!(
            devnet_contract_address(LOCAL_CHAIN_ID),
            devnet_contract_address(LOCAL_CHAIN_ID)
        );
        assert_ne!(
            devnet_contract_address(LOCAL_CHAIN_ID),
            devnet_contract_address(11155111)
        );
    }
}
