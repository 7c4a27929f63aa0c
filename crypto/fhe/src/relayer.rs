//! Relayer-backed encryption SDK
//!
//! The relayer publishes the network's compact public key and performs user
//! decryption for authorized accounts. Encryption itself happens locally:
//! values are encrypted under the public key, handles are derived from the
//! ciphertexts, and the ciphertexts travel inside the input proof.

use std::sync::Arc;

use async_trait::async_trait;
use cipherkind_primitives::{decode_hex, Address, CiphertextHandle};
use jsonrpsee::core::client::Error as ClientError;
use jsonrpsee::core::RpcResult;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::proc_macros::rpc;
use jsonrpsee::types::ErrorObjectOwned;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::input::EncryptedInput;
use crate::keys::PublicEncryptor;
use crate::proof::{InputProof, PackedCiphertext};
use crate::sdk::{ChainProvider, EncryptionSdk, FheInstance, InputValue};
use crate::{FheError, FheResult};

/// Relayer JSON-RPC error codes (-32010 to -32019)
pub mod codes {
    pub const DECRYPTION_DENIED: i32 = -32010;
    pub const DECRYPTION_FAILED: i32 = -32011;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Relayer API, served under the `relayer_` namespace
#[rpc(server, client, namespace = "relayer")]
pub trait RelayerApi {
    /// Chain id the relayer serves
    #[method(name = "chainId")]
    async fn chain_id(&self) -> RpcResult<u64>;

    /// Serialized compact public key, hex encoded
    #[method(name = "publicKey")]
    async fn public_key(&self) -> RpcResult<String>;

    /// Decrypt `handle` for `user` if the ACL allows it
    #[method(name = "userDecrypt")]
    async fn user_decrypt(
        &self,
        handle: CiphertextHandle,
        contract: Address,
        user: Address,
    ) -> RpcResult<Option<u64>>;
}

impl From<FheError> for ErrorObjectOwned {
    fn from(err: FheError) -> Self {
        let code = match &err {
            FheError::DecryptionDenied(_) => codes::DECRYPTION_DENIED,
            FheError::DecryptionFailed(_) => codes::DECRYPTION_FAILED,
            FheError::InvalidProof(_) | FheError::InvalidCiphertext(_) => codes::INVALID_PARAMS,
            _ => codes::INTERNAL_ERROR,
        };
        ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
    }
}

fn from_client_error(err: ClientError) -> FheError {
    match err {
        ClientError::Call(obj) if obj.code() == codes::DECRYPTION_DENIED => {
            FheError::DecryptionDenied(obj.message().to_string())
        }
        ClientError::Call(obj) if obj.code() == codes::DECRYPTION_FAILED => {
            FheError::DecryptionFailed(obj.message().to_string())
        }
        other => FheError::RelayerError(other.to_string()),
    }
}

/// How the SDK reaches a relayer
#[async_trait]
pub trait RelayerTransport: Send + Sync {
    async fn chain_id(&self) -> FheResult<u64>;

    async fn public_key(&self) -> FheResult<Vec<u8>>;

    async fn user_decrypt(
        &self,
        handle: &CiphertextHandle,
        contract: &Address,
        user: &Address,
    ) -> FheResult<Option<u64>>;
}

/// JSON-RPC over HTTP transport
pub struct HttpRelayer {
    client: HttpClient,
    url: String,
}

impl HttpRelayer {
    pub fn new(url: &str) -> FheResult<Self> {
        let client = HttpClientBuilder::default()
            .build(url)
            .map_err(|e| FheError::RelayerError(e.to_string()))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelayerTransport for HttpRelayer {
    async fn chain_id(&self) -> FheResult<u64> {
        RelayerApiClient::chain_id(&self.client)
            .await
            .map_err(from_client_error)
    }

    async fn public_key(&self) -> FheResult<Vec<u8>> {
        let encoded = RelayerApiClient::public_key(&self.client)
            .await
            .map_err(from_client_error)?;
        decode_hex(&encoded).map_err(|e| FheError::SerializationError(e.to_string()))
    }

    async fn user_decrypt(
        &self,
        handle: &CiphertextHandle,
        contract: &Address,
        user: &Address,
    ) -> FheResult<Option<u64>> {
        RelayerApiClient::user_decrypt(&self.client, *handle, *contract, *user)
            .await
            .map_err(from_client_error)
    }
}

/// [`EncryptionSdk`] backed by a relayer
pub struct RelayerSdk {
    transport: Arc<dyn RelayerTransport>,
    chain_id: RwLock<Option<u64>>,
}

impl RelayerSdk {
    pub fn new(transport: Arc<dyn RelayerTransport>) -> Self {
        Self {
            transport,
            chain_id: RwLock::new(None),
        }
    }
}

#[async_trait]
impl EncryptionSdk for RelayerSdk {
    fn is_loaded(&self) -> bool {
        // Linked in, nothing to wait for
        true
    }

    async fn init_sdk(&self) -> FheResult<()> {
        let chain_id = self.transport.chain_id().await?;
        debug!(chain_id, "Relayer reachable");
        *self.chain_id.write() = Some(chain_id);
        Ok(())
    }

    async fn create_instance(
        &self,
        provider: Arc<dyn ChainProvider>,
    ) -> FheResult<Arc<dyn FheInstance>> {
        let cached = *self.chain_id.read();
        let relayer_chain = match cached {
            Some(id) => id,
            None => self.transport.chain_id().await?,
        };

        if relayer_chain != provider.chain_id() {
            return Err(FheError::UnsupportedChain {
                expected: relayer_chain,
                actual: provider.chain_id(),
            });
        }

        let key = self.transport.public_key().await?;
        let key_size = key.len();
        let encryptor = tokio::task::spawn_blocking(move || PublicEncryptor::from_bytes(&key))
            .await
            .map_err(|e| FheError::SerializationError(e.to_string()))??;

        info!(chain_id = relayer_chain, key_size, "Encryption instance created");

        Ok(Arc::new(RelayerInstance {
            encryptor: Arc::new(encryptor),
            transport: self.transport.clone(),
        }))
    }
}

/// Session instance created by [`RelayerSdk`]
pub struct RelayerInstance {
    encryptor: Arc<PublicEncryptor>,
    transport: Arc<dyn RelayerTransport>,
}

#[async_trait]
impl FheInstance for RelayerInstance {
    async fn encrypt(
        &self,
        contract: &Address,
        user: &Address,
        values: &[InputValue],
    ) -> FheResult<EncryptedInput> {
        let encryptor = self.encryptor.clone();
        let values = values.to_vec();
        let (contract, user) = (*contract, *user);

        let proof = tokio::task::spawn_blocking(move || -> FheResult<InputProof> {
            let ciphertexts = values
                .iter()
                .map(|v| {
                    Ok(PackedCiphertext {
                        kind: v.kind(),
                        data: encryptor.encrypt(*v)?,
                    })
                })
                .collect::<FheResult<Vec<_>>>()?;
            Ok(InputProof::new(contract, user, ciphertexts))
        })
        .await
        .map_err(|e| FheError::EncryptionFailed(e.to_string()))??;

        let handles = proof.handles().into_iter().map(|h| h.0.to_vec()).collect();

        Ok(EncryptedInput {
            handles,
            input_proof: proof.to_bytes()?,
        })
    }

    async fn user_decrypt(
        &self,
        handle: &CiphertextHandle,
        contract: &Address,
        user: &Address,
    ) -> FheResult<Option<u64>> {
        self.transport.user_decrypt(handle, contract, user).await
    }
}
