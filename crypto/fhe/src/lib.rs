//! CipherKind FHE client
//!
//! Encrypts donation amounts for the confidential donation contract and
//! decrypts aggregate totals the connected account is authorized to see.
//!
//! # Layout:
//! - `service`: session-wide encryption service with bounded retries
//! - `input`: encrypted input builder bound to a contract/user pair
//! - `sdk`: the seams the service drives (SDK, instance, chain provider)
//! - `relayer`: SDK implementation talking to a relayer over JSON-RPC
//! - `keys` / `proof`: TFHE-rs key material, handles and input proofs

pub mod errors;
pub mod input;
pub mod keys;
pub mod proof;
pub mod relayer;
pub mod sdk;
pub mod service;

#[cfg(test)]
mod test_support;

pub use errors::FheError;
pub use input::{EncryptedInput, EncryptedInputBuilder};
pub use keys::{network_config, NetworkKeys, PublicEncryptor};
pub use proof::{derive_handle, InputProof, PackedCiphertext};
pub use relayer::{
    HttpRelayer, RelayerApiClient, RelayerApiServer, RelayerInstance, RelayerSdk,
    RelayerTransport,
};
pub use sdk::{ChainProvider, EncryptionSdk, FheInstance, InputValue, RpcProvider, ValueKind};
pub use service::{
    EncryptionService, RetryPolicy, ServiceConfig, ServiceState, INIT_FAILED_MESSAGE,
    PROVIDER_MISSING_MESSAGE,
};

/// Result type for FHE operations
pub type FheResult<T> = Result<T, FheError>;
