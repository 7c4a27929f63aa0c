//! Hex encoding and ciphertext handle normalization

use crate::types::{Bytes32, PrimitiveError};

/// Length of a ciphertext handle on the wire
pub const HANDLE_LEN: usize = 32;

/// Length of an encoded handle including the `0x` prefix
pub const HANDLE_HEX_LEN: usize = 2 + HANDLE_LEN * 2;

/// Encode bytes as `0x`-prefixed lowercase hex
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode hex with or without the `0x` prefix
pub fn decode_hex(s: &str) -> Result<Vec<u8>, PrimitiveError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| PrimitiveError::InvalidHex(e.to_string()))
}

/// Render a raw handle as a call argument.
///
/// The result is always [`HANDLE_HEX_LEN`] characters: shorter handles are
/// right-padded with `0` digits, longer ones are cut to the first 32 bytes.
pub fn encode_handle_hex(raw: &[u8]) -> String {
    let mut digits = hex::encode(raw);
    let wanted = HANDLE_LEN * 2;

    if digits.len() < wanted {
        digits.extend(std::iter::repeat('0').take(wanted - digits.len()));
    } else {
        digits.truncate(wanted);
    }

    format!("0x{digits}")
}

/// Byte-level counterpart of [`encode_handle_hex`]
pub fn normalize_handle(raw: &[u8]) -> Bytes32 {
    let mut out = [0u8; HANDLE_LEN];
    let n = raw.len().min(HANDLE_LEN);
    out[..n].copy_from_slice(&raw[..n]);
    Bytes32(out)
}
