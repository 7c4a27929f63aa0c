//! Encryption SDK seams
//!
//! The service never talks to an FHE library directly. It drives an
//! [`EncryptionSdk`] that yields an opaque [`FheInstance`], and it needs a
//! [`ChainProvider`] handle describing the chain the wallet is connected to.

use std::sync::Arc;

use async_trait::async_trait;
use cipherkind_primitives::{Address, CiphertextHandle};
use serde::{Deserialize, Serialize};

use crate::input::EncryptedInput;
use crate::FheResult;

/// Handle to the chain connection supplied by the wallet
pub trait ChainProvider: Send + Sync {
    /// Chain the provider is connected to
    fn chain_id(&self) -> u64;

    /// RPC endpoint behind the provider
    fn endpoint(&self) -> &str;
}

/// Provider for a fixed RPC endpoint
#[derive(Debug, Clone)]
pub struct RpcProvider {
    chain_id: u64,
    endpoint: String,
}

impl RpcProvider {
    pub fn new(chain_id: u64, endpoint: impl Into<String>) -> Self {
        Self {
            chain_id,
            endpoint: endpoint.into(),
        }
    }
}

impl ChainProvider for RpcProvider {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Encrypted value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    U32,
    U64,
}

/// A typed plaintext field of an encrypted input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputValue {
    Bool(bool),
    U32(u32),
    U64(u64),
}

impl InputValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::U32(_) => ValueKind::U32,
            Self::U64(_) => ValueKind::U64,
        }
    }
}

/// External encryption SDK
#[async_trait]
pub trait EncryptionSdk: Send + Sync {
    /// Whether the SDK is loaded and callable
    fn is_loaded(&self) -> bool;

    /// One-time SDK setup
    async fn init_sdk(&self) -> FheResult<()>;

    /// Create a session instance bound to the provider's chain
    async fn create_instance(
        &self,
        provider: Arc<dyn ChainProvider>,
    ) -> FheResult<Arc<dyn FheInstance>>;
}

/// Opaque session capability produced by the SDK
#[async_trait]
pub trait FheInstance: Send + Sync {
    /// Encrypt `values` for `contract`, bound to `user`.
    ///
    /// Returns one handle per value and a single proof covering all of them.
    async fn encrypt(
        &self,
        contract: &Address,
        user: &Address,
        values: &[InputValue],
    ) -> FheResult<EncryptedInput>;

    /// Ask the network to decrypt `handle` for `user`.
    ///
    /// `Ok(None)` means the network answered without a value.
    async fn user_decrypt(
        &self,
        handle: &CiphertextHandle,
        contract: &Address,
        user: &Address,
    ) -> FheResult<Option<u64>>;
}
