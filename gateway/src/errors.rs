//! Gateway Error Types

use jsonrpsee::core::client::Error as ClientError;
use jsonrpsee::types::ErrorObjectOwned;
use thiserror::Error;

/// Contract error codes: JSON-RPC 2.0 standard codes + CipherKind contract codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractErrorCode {
    // Standard JSON-RPC errors
    InvalidParams = -32602,
    InternalError = -32603,

    // Contract errors (-32000 to -32009)
    CampaignNotFound = -32000,
    CampaignInactive = -32001,
    InvalidInputProof = -32002,
    InvalidCampaign = -32003,
    TransactionNotFound = -32004,
}

impl ContractErrorCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Codes that mean the requested record does not exist
    pub fn is_not_found(code: i32) -> bool {
        code == Self::CampaignNotFound.code() || code == Self::TransactionNotFound.code()
    }
}

/// Gateway errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GatewayError {
    /// Transport failure; nothing reached the contract
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The contract (or its RPC front) refused the call
    #[error("Rejected by contract ({code}): {message}")]
    RemoteRejected { code: i32, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn rejected(code: ContractErrorCode, message: impl Into<String>) -> Self {
        Self::RemoteRejected {
            code: code.code(),
            message: message.into(),
        }
    }

    /// Whether the user can usefully try again
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError(_) | Self::RemoteRejected { .. })
    }
}

impl From<ClientError> for GatewayError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Call(obj) if ContractErrorCode::is_not_found(obj.code()) => {
                GatewayError::NotFound(obj.message().to_string())
            }
            ClientError::Call(obj) => GatewayError::RemoteRejected {
                code: obj.code(),
                message: obj.message().to_string(),
            },
            other => GatewayError::NetworkError(other.to_string()),
        }
    }
}

impl From<GatewayError> for ErrorObjectOwned {
    fn from(err: GatewayError) -> Self {
        let (code, message) = match &err {
            GatewayError::RemoteRejected { code, message } => (*code, message.clone()),
            GatewayError::NotFound(msg) => (ContractErrorCode::CampaignNotFound.code(), msg.clone()),
            GatewayError::NetworkError(msg) | GatewayError::InvalidResponse(msg) => {
                (ContractErrorCode::InternalError.code(), msg.clone())
            }
        };

        ErrorObjectOwned::owned(code, message, None::<()>)
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
