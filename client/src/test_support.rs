//! Test doubles for the session seams

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cipherkind_fhe::{
    ChainProvider, EncryptedInput, EncryptionSdk, EncryptionService, FheError, FheInstance,
    FheResult, InputValue, RpcProvider, ServiceConfig,
};
use cipherkind_gateway::{
    Campaign, ContractEvent, ContractGateway, EncryptedAggregate, GatewayError, GatewayResult,
    PlatformStats, TxReceipt,
};
use cipherkind_primitives::{Address, CampaignId, CiphertextHandle, TxHash};
use parking_lot::Mutex;

use crate::session::Session;
use crate::wallet::Wallet;

pub const DONOR: Address = Address::new([0xd0; 20]);
pub const CREATOR: Address = Address::new([0xc0; 20]);
pub const CONTRACT: Address = Address::new([0xcc; 20]);

const CHAIN_ID: u64 = 31337;

fn counter_id(prefix: u8, n: u64) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[0] = prefix;
    bytes[24..].copy_from_slice(&n.to_be_bytes());
    bytes
}

/// Instance that records encryptions and decrypts from a lookup table
#[derive(Default)]
pub struct MockInstance {
    encrypted: Mutex<Vec<Vec<InputValue>>>,
    plaintexts: Mutex<HashMap<CiphertextHandle, u64>>,
    decrypt_failure: Mutex<Option<FheError>>,
    counter: AtomicU64,
}

impl MockInstance {
    pub fn encrypted_values(&self) -> Vec<Vec<InputValue>> {
        self.encrypted.lock().clone()
    }

    pub fn set_plaintext(&self, handle: CiphertextHandle, value: u64) {
        self.plaintexts.lock().insert(handle, value);
    }

    /// Fail every later decryption with `err`
    pub fn fail_decryption(&self, err: FheError) {
        *self.decrypt_failure.lock() = Some(err);
    }
}

#[async_trait]
impl FheInstance for MockInstance {
    async fn encrypt(
        &self,
        _contract: &Address,
        _user: &Address,
        values: &[InputValue],
    ) -> FheResult<EncryptedInput> {
        self.encrypted.lock().push(values.to_vec());

        let handles = values
            .iter()
            .map(|_| {
                let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
                n.to_be_bytes().to_vec()
            })
            .collect();

        Ok(EncryptedInput {
            handles,
            input_proof: vec![0xff; 8],
        })
    }

    async fn user_decrypt(
        &self,
        handle: &CiphertextHandle,
        _contract: &Address,
        _user: &Address,
    ) -> FheResult<Option<u64>> {
        if let Some(err) = self.decrypt_failure.lock().clone() {
            return Err(err);
        }
        Ok(self.plaintexts.lock().get(handle).copied())
    }
}

/// SDK that hands out one shared instance
pub struct MockSdk {
    instance: Arc<MockInstance>,
}

impl MockSdk {
    pub fn new(instance: Arc<MockInstance>) -> Self {
        Self { instance }
    }
}

#[async_trait]
impl EncryptionSdk for MockSdk {
    fn is_loaded(&self) -> bool {
        true
    }

    async fn init_sdk(&self) -> FheResult<()> {
        Ok(())
    }

    async fn create_instance(
        &self,
        _provider: Arc<dyn ChainProvider>,
    ) -> FheResult<Arc<dyn FheInstance>> {
        Ok(self.instance.clone())
    }
}

/// Donation as received by [`MockGateway`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDonation {
    pub from: Address,
    pub campaign_id: CampaignId,
    pub encrypted_amount: Vec<u8>,
    pub proof: Vec<u8>,
}

#[derive(Default)]
struct Contract {
    order: Vec<CampaignId>,
    campaigns: HashMap<CampaignId, Campaign>,
    totals: HashMap<CampaignId, CiphertextHandle>,
    donations: Vec<RecordedDonation>,
    receipts: HashMap<TxHash, TxReceipt>,
    next_id: u64,
    next_tx: u64,
    read_failure: Option<GatewayError>,
    write_failure: Option<GatewayError>,
}

impl Contract {
    fn insert(&mut self, creator: Address, title: &str, description: &str) -> CampaignId {
        self.next_id += 1;
        let id = CampaignId::new(counter_id(0x1d, self.next_id));

        self.order.push(id);
        self.totals
            .insert(id, CiphertextHandle::new(counter_id(0x70, self.next_id)));
        self.campaigns.insert(
            id,
            Campaign {
                id,
                creator,
                title: title.to_string(),
                description: description.to_string(),
                is_active: true,
                created_at: 1_700_000_000 + self.next_id,
                completed_at: None,
                donor_count: 0,
            },
        );
        id
    }

    fn receipt(&mut self, from: Address, events: Vec<ContractEvent>) -> TxHash {
        self.next_tx += 1;
        let tx_hash = TxHash::new(counter_id(0x7a, self.next_tx));
        self.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                from,
                block_number: self.next_tx,
                events,
            },
        );
        tx_hash
    }

    fn check_read(&self) -> GatewayResult<()> {
        match &self.read_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn check_write(&self) -> GatewayResult<()> {
        match &self.write_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// In-memory contract with scripted failures
pub struct MockGateway {
    contract: Mutex<Contract>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            contract: Mutex::new(Contract::default()),
        }
    }

    /// Add an active campaign owned by [`CREATOR`]
    pub fn add_campaign(&self, title: &str) -> CampaignId {
        self.contract.lock().insert(CREATOR, title, "")
    }

    /// Handle of a campaign's encrypted total
    pub fn total_of(&self, id: &CampaignId) -> CiphertextHandle {
        self.contract
            .lock()
            .totals
            .get(id)
            .copied()
            .unwrap_or_default()
    }

    pub fn campaign_ids(&self) -> Vec<CampaignId> {
        self.contract.lock().order.clone()
    }

    pub fn campaign(&self, id: &CampaignId) -> Option<Campaign> {
        self.contract.lock().campaigns.get(id).cloned()
    }

    pub fn donations(&self) -> Vec<RecordedDonation> {
        self.contract.lock().donations.clone()
    }

    pub fn fail_reads_with(&self, err: GatewayError) {
        self.contract.lock().read_failure = Some(err);
    }

    pub fn fail_writes_with(&self, err: GatewayError) {
        self.contract.lock().write_failure = Some(err);
    }

    pub fn clear_failures(&self) {
        let mut contract = self.contract.lock();
        contract.read_failure = None;
        contract.write_failure = None;
    }
}

#[async_trait]
impl ContractGateway for MockGateway {
    fn contract_address(&self) -> Address {
        CONTRACT
    }

    async fn list_campaigns(&self) -> GatewayResult<Vec<CampaignId>> {
        let contract = self.contract.lock();
        contract.check_read()?;
        Ok(contract.order.clone())
    }

    async fn get_campaign(&self, id: &CampaignId) -> GatewayResult<Campaign> {
        let contract = self.contract.lock();
        contract.check_read()?;
        contract
            .campaigns
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("campaign {}", id.short())))
    }

    async fn get_encrypted_aggregate(&self, id: &CampaignId) -> GatewayResult<EncryptedAggregate> {
        let contract = self.contract.lock();
        contract.check_read()?;
        contract
            .totals
            .get(id)
            .map(|total| EncryptedAggregate {
                campaign_id: *id,
                encrypted_total_raised: *total,
            })
            .ok_or_else(|| GatewayError::NotFound(format!("campaign {}", id.short())))
    }

    async fn platform_stats(&self) -> GatewayResult<PlatformStats> {
        let contract = self.contract.lock();
        contract.check_read()?;
        Ok(PlatformStats {
            total_campaigns: contract.order.len() as u64,
            active_campaigns: contract.campaigns.values().filter(|c| c.is_active).count() as u64,
            total_donations: contract.donations.len() as u64,
        })
    }

    async fn submit_donation(
        &self,
        from: &Address,
        campaign_id: &CampaignId,
        encrypted_amount: &[u8],
        proof: &[u8],
    ) -> GatewayResult<TxHash> {
        let mut contract = self.contract.lock();
        contract.check_write()?;

        let campaign = contract
            .campaigns
            .get_mut(campaign_id)
            .ok_or_else(|| GatewayError::NotFound(format!("campaign {}", campaign_id.short())))?;
        campaign.donor_count += 1;

        contract.donations.push(RecordedDonation {
            from: *from,
            campaign_id: *campaign_id,
            encrypted_amount: encrypted_amount.to_vec(),
            proof: proof.to_vec(),
        });
        Ok(contract.receipt(
            *from,
            vec![ContractEvent::DonationMade {
                campaign_id: *campaign_id,
                donor: *from,
            }],
        ))
    }

    async fn submit_campaign_creation(
        &self,
        from: &Address,
        title: &str,
        description: &str,
        _encrypted_target: &[u8],
        _proof: &[u8],
    ) -> GatewayResult<TxHash> {
        let mut contract = self.contract.lock();
        contract.check_write()?;

        let campaign_id = contract.insert(*from, title, description);
        Ok(contract.receipt(
            *from,
            vec![ContractEvent::CampaignCreated {
                campaign_id,
                creator: *from,
                title: title.to_string(),
            }],
        ))
    }

    async fn transaction_receipt(&self, tx_hash: &TxHash) -> GatewayResult<Option<TxReceipt>> {
        let contract = self.contract.lock();
        contract.check_read()?;
        Ok(contract.receipts.get(tx_hash).cloned())
    }
}

/// Mocks shared between a session and the test asserting on it
pub struct Fixture {
    pub instance: Arc<MockInstance>,
    pub gateway: Arc<MockGateway>,
    pub wallet: Arc<Wallet>,
}

impl Fixture {
    /// Wallet connected as [`DONOR`]
    pub fn connected() -> Self {
        let fixture = Self::disconnected();
        fixture.connect();
        fixture
    }

    pub fn disconnected() -> Self {
        Self {
            instance: Arc::new(MockInstance::default()),
            gateway: Arc::new(MockGateway::new()),
            wallet: Arc::new(Wallet::new()),
        }
    }

    pub fn connect(&self) {
        self.wallet
            .connect(DONOR, RpcProvider::new(CHAIN_ID, "devnet://test"));
    }
}

pub fn session_with(fixture: &Fixture, sdk: MockSdk) -> Session {
    let encryption = EncryptionService::new(ServiceConfig::default(), Arc::new(sdk));
    Session::new(
        Arc::new(encryption),
        fixture.gateway.clone(),
        fixture.wallet.clone(),
    )
}

/// Session whose encryption service is not initialized yet
pub fn session(fixture: &Fixture) -> Session {
    session_with(fixture, MockSdk::new(fixture.instance.clone()))
}

/// Session with encryption ready
pub async fn ready_session(fixture: &Fixture) -> Session {
    let session = session(fixture);
    session
        .initialize_encryption()
        .await
        .expect("mock encryption initializes");
    session
}
