//! Shared fixtures: key generation is slow, so every test reuses one key set

use std::sync::Arc;

use cipherkind_fhe::{
    EncryptedInput, EncryptionSdk, FheInstance, InputValue, NetworkKeys, RelayerSdk,
};
use cipherkind_primitives::Address;
use once_cell::sync::Lazy;

use crate::chain::{DevnetChain, DevnetConfig};

static KEYS: Lazy<Arc<NetworkKeys>> = Lazy::new(|| Arc::new(NetworkKeys::generate()));

/// Fresh chain on the shared keys
pub fn chain() -> Arc<DevnetChain> {
    Arc::new(DevnetChain::new(DevnetConfig::default(), KEYS.clone()).unwrap())
}

/// Encrypt `cents` for `user` the way a wallet would, through the relayer SDK
pub async fn encrypt_cents(chain: &Arc<DevnetChain>, user: Address, cents: u32) -> EncryptedInput {
    let sdk = RelayerSdk::new(chain.clone());
    let instance = sdk.create_instance(Arc::new(chain.provider())).await.unwrap();
    instance
        .encrypt(&chain.contract_address(), &user, &[InputValue::U32(cents)])
        .await
        .unwrap()
}
