//! Fixed-size byte values

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::encoding::{decode_hex, encode_hex};

/// Errors from parsing primitive values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Number of bytes
            pub const LEN: usize = $len;

            /// All-zero value
            pub const ZERO: Self = Self([0u8; $len]);

            /// Wrap raw bytes
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Borrow the raw bytes
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Whether every byte is zero
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            /// Copy from a slice of exactly the right length
            pub fn from_slice(bytes: &[u8]) -> Result<Self, PrimitiveError> {
                let array: [u8; $len] = bytes.try_into().map_err(|_| {
                    PrimitiveError::InvalidLength { expected: $len, actual: bytes.len() }
                })?;
                Ok(Self(array))
            }

            /// Parse `0x`-prefixed (or bare) hex of exactly the right length
            pub fn from_hex(s: &str) -> Result<Self, PrimitiveError> {
                Self::from_slice(&decode_hex(s)?)
            }

            /// `0x`-prefixed lowercase hex
            pub fn to_hex(&self) -> String {
                encode_hex(&self.0)
            }

            /// Short form for logs: first four bytes
            pub fn short(&self) -> String {
                format!("0x{}…", hex::encode(&self.0[..4]))
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = PrimitiveError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s.trim())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(de::Error::custom)
            }
        }
    };
}

fixed_bytes!(
    /// 32-byte opaque token
    Bytes32,
    32
);

fixed_bytes!(
    /// 20-byte account or contract address
    Address,
    20
);

/// Campaign identifier assigned by the contract
pub type CampaignId = Bytes32;

/// Handle referencing an encrypted value held by the network
pub type CiphertextHandle = Bytes32;

/// Transaction hash
pub type TxHash = Bytes32;
