//! Devnet errors

use cipherkind_fhe::FheError;
use cipherkind_gateway::{ContractErrorCode, GatewayError};
use jsonrpsee::types::ErrorObjectOwned;
use thiserror::Error;

/// Devnet result type
pub type DevnetResult<T> = Result<T, DevnetError>;

/// Devnet errors
#[derive(Error, Debug)]
pub enum DevnetError {
    #[error("Campaign not found: {0}")]
    CampaignNotFound(String),

    #[error("Campaign is not active: {0}")]
    CampaignInactive(String),

    /// Creation arguments rejected by the contract
    #[error("Invalid campaign: {0}")]
    InvalidCampaign(String),

    /// Only the creator may do this
    #[error("Not the campaign creator: {0}")]
    NotCreator(String),

    /// Malformed call argument
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Proof or ciphertext rejected
    #[error(transparent)]
    Fhe(#[from] FheError),

    /// Blocking execution task failed
    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Server error: {0}")]
    ServerError(String),
}

impl From<DevnetError> for GatewayError {
    fn from(err: DevnetError) -> Self {
        let message = err.to_string();
        let code = match err {
            DevnetError::CampaignNotFound(_) => return GatewayError::NotFound(message),
            DevnetError::CampaignInactive(_) => ContractErrorCode::CampaignInactive,
            DevnetError::InvalidCampaign(_) | DevnetError::NotCreator(_) => {
                ContractErrorCode::InvalidCampaign
            }
            DevnetError::InvalidParams(_) => ContractErrorCode::InvalidParams,
            DevnetError::Fhe(FheError::InvalidProof(_) | FheError::InvalidCiphertext(_)) => {
                ContractErrorCode::InvalidInputProof
            }
            DevnetError::Fhe(_) | DevnetError::Execution(_) | DevnetError::ServerError(_) => {
                ContractErrorCode::InternalError
            }
        };
        GatewayError::rejected(code, message)
    }
}

impl From<DevnetError> for ErrorObjectOwned {
    fn from(err: DevnetError) -> Self {
        GatewayError::from(err).into()
    }
}
