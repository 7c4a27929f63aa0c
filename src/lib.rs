//! CipherKind: private donations with encrypted campaign totals
//!
//! This is the root crate that re-exports all CipherKind components for
//! integration testing and provides unified access to the client flows.
//!
//! ## Architecture Overview
//!
//! Donation amounts are encrypted on the client before they leave the device.
//! The contract only ever holds ciphertext handles; totals are accumulated
//! homomorphically and decrypted by the relayer for accounts on the access
//! list.
//!
//! ## Crate Organization
//!
//! - `cipherkind-primitives`: Addresses, handles, hex encoding
//! - `cipherkind-fhe`: Encryption service lifecycle and the relayer SDK
//! - `cipherkind-gateway`: Typed contract reads and writes over JSON-RPC
//! - `cipherkind-devnet`: Local contract and relayer on real TFHE ciphertexts
//! - `cipherkind-client`: Donation wizard, campaign views, campaign creation

pub use cipherkind_client as client;
pub use cipherkind_devnet as devnet;
pub use cipherkind_fhe as fhe;
pub use cipherkind_gateway as gateway;
pub use cipherkind_primitives as primitives;

/// CipherKind version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use cipherkind_client::{
        Amount, CampaignBoard, CampaignComposer, CampaignView, DonationFlow, DonationStep,
        Session, Wallet, WalletSession,
    };
    pub use cipherkind_fhe::{EncryptionService, HttpRelayer, RelayerSdk, ServiceConfig};
    pub use cipherkind_gateway::{ContractGateway, RpcGateway};
    pub use cipherkind_primitives::{Address, CampaignId, CiphertextHandle, TxHash};
}
