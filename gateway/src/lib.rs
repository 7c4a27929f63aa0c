//! CipherKind contract gateway
//!
//! Typed client for the donation contract, plus the JSON-RPC API definition
//! shared with whatever serves the contract.
//!
//! # Supported Methods
//!
//! ## Reads
//! - `cipherkind_contractAddress` - Deployed contract address
//! - `cipherkind_getAllCampaigns` - Campaign ids in creation order
//! - `cipherkind_getCampaign` - Campaign record
//! - `cipherkind_getCampaignEncryptedData` - Encrypted total raised
//! - `cipherkind_getPlatformStats` - Platform counters
//! - `cipherkind_getTransactionReceipt` - Receipt with contract events
//!
//! ## Writes
//! - `cipherkind_createCampaign` - Create a campaign with an encrypted target
//! - `cipherkind_makeDonation` - Donate an encrypted amount

pub mod api;
pub mod errors;
pub mod gateway;
pub mod types;

pub use api::{CampaignApiClient, CampaignApiServer};
pub use errors::{ContractErrorCode, GatewayError, GatewayResult};
pub use gateway::{encrypted_call_args, ContractGateway, RpcGateway};
pub use types::*;

/// Default JSON-RPC port
pub const DEFAULT_RPC_PORT: u16 = 8545;
