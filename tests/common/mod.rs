//! Shared fixtures for the integration suites.
//!
//! Key generation takes seconds, so every test in a binary reuses one key set.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use cipherkind::client::{Session, Wallet};
use cipherkind::devnet::{DevnetChain, DevnetConfig};
use cipherkind::fhe::{
    EncryptionService, NetworkKeys, RelayerSdk, RelayerTransport, RetryPolicy, RpcProvider,
    ServiceConfig,
};
use cipherkind::gateway::ContractGateway;
use cipherkind::primitives::Address;
use once_cell::sync::Lazy;

pub const CREATOR: Address = Address::new([0xa1; 20]);
pub const DONOR: Address = Address::new([0xb0; 20]);
pub const OTHER_DONOR: Address = Address::new([0xb1; 20]);

static KEYS: Lazy<Arc<NetworkKeys>> = Lazy::new(|| Arc::new(NetworkKeys::generate()));

/// Fresh devnet chain on the shared keys
pub fn chain() -> Arc<DevnetChain> {
    Arc::new(DevnetChain::new(DevnetConfig::default(), KEYS.clone()).unwrap())
}

/// Service config that fails fast instead of backing off for seconds
pub fn fast_config() -> ServiceConfig {
    ServiceConfig {
        retry: RetryPolicy {
            max_retries: 0,
            base_delay: Duration::from_millis(10),
        },
        ..Default::default()
    }
}

/// Session for `account`, wired to `gateway` and a relayer behind `transport`
pub fn session(
    gateway: Arc<dyn ContractGateway>,
    transport: Arc<dyn RelayerTransport>,
    account: Address,
    provider: RpcProvider,
) -> Session {
    let sdk = RelayerSdk::new(transport);
    let encryption = EncryptionService::new(fast_config(), Arc::new(sdk));
    let wallet = Wallet::connected(account, provider);
    Session::new(Arc::new(encryption), gateway, Arc::new(wallet))
}
