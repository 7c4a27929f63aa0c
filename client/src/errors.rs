//! Client error types

use cipherkind_fhe::FheError;
use cipherkind_gateway::GatewayError;
use thiserror::Error;

/// Input problems the user can fix
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a donation amount")]
    EmptyAmount,

    #[error("Invalid amount: {0}")]
    MalformedAmount(String),

    #[error("Please enter a valid amount greater than zero")]
    NonPositiveAmount,

    #[error("Amounts are limited to two decimal places")]
    TooPrecise,

    #[error("Amount is too large")]
    AmountTooLarge,

    #[error("Please connect your wallet first")]
    WalletNotConnected,

    #[error("Wallet account changed, please encrypt the amount again")]
    AccountChanged,

    #[error("Campaign title is required")]
    EmptyTitle,
}

/// Client errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encryption(#[from] FheError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Action not available at the current wizard step
    #[error("Not available at step {0}")]
    InvalidStep(u8),

    /// Receipt did not carry the expected event
    #[error("Transaction {0} has no CampaignCreated event")]
    MissingEvent(String),
}

impl ClientError {
    /// Whether resubmitting can succeed without changing the input
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Gateway(e) => e.is_retryable(),
            ClientError::Encryption(FheError::NotReady) => true,
            _ => false,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
