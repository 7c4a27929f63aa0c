//! Network key material with TFHE-rs
//!
//! - ClientKey: decrypts; held by the network's decryption service only
//! - ServerKey: homomorphic operations; held by the contract executor
//! - CompactPublicKey: encryption only; published through the relayer

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

use tfhe::prelude::*;
use tfhe::shortint::parameters::PARAM_MESSAGE_2_CARRY_2_COMPACT_PK_KS_PBS;
use tfhe::{
    generate_keys, ClientKey, CompactFheBool, CompactFheUint32, CompactFheUint64,
    CompactPublicKey, Config, ConfigBuilder, ServerKey,
};

use crate::sdk::InputValue;
use crate::{FheError, FheResult};

/// Parameters shared by every key of the network.
///
/// Compact public-key encryption needs the `COMPACT_PK` parameter set.
pub fn network_config() -> Config {
    ConfigBuilder::default()
        .use_custom_parameters(PARAM_MESSAGE_2_CARRY_2_COMPACT_PK_KS_PBS, None)
        .build()
}

static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    // Id of the key set whose server key is installed on this thread
    static INSTALLED: Cell<u64> = Cell::new(0);
}

/// Complete key set of a network
#[derive(Clone)]
pub struct NetworkKeys {
    id: u64,
    client: ClientKey,
    server: ServerKey,
    public: CompactPublicKey,
}

impl NetworkKeys {
    /// Generate a fresh key set (slow: seconds)
    pub fn generate() -> Self {
        let (client, server) = generate_keys(network_config());
        let public = CompactPublicKey::new(&client);

        Self {
            id: NEXT_KEY_ID.fetch_add(1, Ordering::Relaxed),
            client,
            server,
            public,
        }
    }

    pub fn client(&self) -> &ClientKey {
        &self.client
    }

    pub fn server(&self) -> &ServerKey {
        &self.server
    }

    pub fn public(&self) -> &CompactPublicKey {
        &self.public
    }

    /// Make the server key current on this thread.
    ///
    /// TFHE-rs keeps the server key thread-local, so every blocking task that
    /// runs homomorphic operations calls this first. Installing is skipped on
    /// threads that already hold this key set.
    pub fn install_server_key(&self) {
        INSTALLED.with(|installed| {
            if installed.get() != self.id {
                tfhe::set_server_key(self.server.clone());
                installed.set(self.id);
            }
        });
    }

    /// Serialized public key as published by the relayer
    pub fn public_key_bytes(&self) -> FheResult<Vec<u8>> {
        bincode::serialize(&self.public).map_err(|e| FheError::SerializationError(e.to_string()))
    }

    /// Short identifier of the public key
    pub fn fingerprint(&self) -> FheResult<[u8; 32]> {
        Ok(*blake3::hash(&self.public_key_bytes()?).as_bytes())
    }
}

impl std::fmt::Debug for NetworkKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self
            .fingerprint()
            .map(|h| hex::encode(&h[..8]))
            .unwrap_or_else(|_| "?".into());
        f.debug_struct("NetworkKeys").field("public_key", &id).finish()
    }
}

/// Client-side encryptor holding only the public key
#[derive(Clone)]
pub struct PublicEncryptor {
    key: CompactPublicKey,
}

impl PublicEncryptor {
    pub fn new(key: CompactPublicKey) -> Self {
        Self { key }
    }

    /// Decode a key published by the relayer
    pub fn from_bytes(bytes: &[u8]) -> FheResult<Self> {
        let key: CompactPublicKey = bincode::deserialize(bytes)
            .map_err(|e| FheError::SerializationError(format!("public key: {e}")))?;
        Ok(Self { key })
    }

    /// Encrypt one value into serialized compact ciphertext bytes
    pub fn encrypt(&self, value: InputValue) -> FheResult<Vec<u8>> {
        let serialized = match value {
            InputValue::Bool(v) => bincode::serialize(&CompactFheBool::encrypt(v, &self.key)),
            InputValue::U32(v) => bincode::serialize(&CompactFheUint32::encrypt(v, &self.key)),
            InputValue::U64(v) => bincode::serialize(&CompactFheUint64::encrypt(v, &self.key)),
        };
        serialized.map_err(|e| FheError::EncryptionFailed(e.to_string()))
    }
}

impl std::fmt::Debug for PublicEncryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicEncryptor").finish_non_exhaustive()
    }
}
