//! Wallet session
//!
//! Connecting a wallet happens elsewhere; flows only ask whether an account is
//! connected, which one, and for the chain provider behind it.

use std::sync::Arc;

use cipherkind_fhe::{ChainProvider, RpcProvider};
use cipherkind_primitives::Address;
use parking_lot::RwLock;
use tracing::info;

/// What flows need to know about the connected wallet
pub trait WalletSession: Send + Sync {
    /// Connected account, if any
    fn account(&self) -> Option<Address>;

    /// Chain provider of the connection, if any
    fn provider(&self) -> Option<Arc<dyn ChainProvider>>;

    fn is_connected(&self) -> bool {
        self.account().is_some()
    }
}

#[derive(Clone)]
struct Connection {
    account: Address,
    provider: Arc<RpcProvider>,
}

/// Wallet holding at most one connection
#[derive(Default)]
pub struct Wallet {
    connection: RwLock<Option<Connection>>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wallet already connected to `account` on `provider`
    pub fn connected(account: Address, provider: RpcProvider) -> Self {
        let wallet = Self::new();
        wallet.connect(account, provider);
        wallet
    }

    pub fn connect(&self, account: Address, provider: RpcProvider) {
        info!(%account, chain_id = provider.chain_id(), "Wallet connected");
        *self.connection.write() = Some(Connection {
            account,
            provider: Arc::new(provider),
        });
    }

    /// Switch account, keeping the chain connection
    pub fn switch_account(&self, account: Address) {
        if let Some(connection) = self.connection.write().as_mut() {
            info!(from = %connection.account, to = %account, "Wallet account switched");
            connection.account = account;
        }
    }

    pub fn disconnect(&self) {
        if self.connection.write().take().is_some() {
            info!("Wallet disconnected");
        }
    }
}

impl WalletSession for Wallet {
    fn account(&self) -> Option<Address> {
        self.connection.read().as_ref().map(|c| c.account)
    }

    fn provider(&self) -> Option<Arc<dyn ChainProvider>> {
        self.connection
            .read()
            .as_ref()
            .map(|c| c.provider.clone() as Arc<dyn ChainProvider>)
    }
}
