//! CipherKind devnet
//!
//! A local stand-in for the chain, the donation contract and the relayer.
//! Ciphertexts are real TFHE-rs values: donation totals are accumulated
//! homomorphically and only the campaign creator can decrypt them.

pub mod chain;
pub mod errors;
pub mod gateway;
pub mod server;

#[cfg(test)]
mod test_support;

pub use chain::{
    devnet_contract_address, DevnetChain, DevnetConfig, IN_PROCESS_ENDPOINT, LOCAL_CHAIN_ID,
};
pub use errors::{DevnetError, DevnetResult};
pub use gateway::LocalGateway;
pub use server::{DevnetServer, ServerConfig};
