//! CipherKind Primitives
//!
//! Fixed-size byte types shared by the encryption client, the contract
//! gateway and the devnet, plus the hex rules used on the wire.
//!
//! Every 32-byte value (campaign ids, ciphertext handles, transaction hashes)
//! and every 20-byte account travels as a `0x`-prefixed lowercase hex string.

pub mod encoding;
pub mod types;

pub use encoding::{
    decode_hex, encode_handle_hex, encode_hex, normalize_handle, HANDLE_HEX_LEN, HANDLE_LEN,
};
pub use types::{Address, Bytes32, CampaignId, CiphertextHandle, PrimitiveError, TxHash};
