//! Encryption service error types

use thiserror::Error;

/// Errors that can occur while initializing or using the encryption service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FheError {
    /// No chain provider handle is attached
    #[error("Chain provider not found")]
    ProviderUnavailable,

    /// The SDK did not become available in time
    #[error("Encryption SDK not available after {0}ms")]
    SdkUnavailable(u64),

    /// Operation attempted before initialization completed
    #[error("Encryption service not ready")]
    NotReady,

    /// Initialization exhausted its retries
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Provider and relayer disagree on the chain
    #[error("Unsupported chain: relayer serves {expected}, provider is on {actual}")]
    UnsupportedChain { expected: u64, actual: u64 },

    /// Encrypted input with no values
    #[error("Encrypted input has no values")]
    EmptyInput,

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Caller is not allowed to decrypt this handle
    #[error("Decryption denied: {0}")]
    DecryptionDenied(String),

    /// Decryption failed or returned no value
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Input proof is malformed or does not match the handle
    #[error("Invalid input proof: {0}")]
    InvalidProof(String),

    /// Ciphertext bytes could not be decoded
    #[error("Invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Relayer transport failure
    #[error("Relayer error: {0}")]
    RelayerError(String),
}

impl FheError {
    /// Decryption errors only hide a value; they never break a view
    pub fn is_decryption_error(&self) -> bool {
        matches!(self, Self::DecryptionDenied(_) | Self::DecryptionFailed(_))
    }
}
