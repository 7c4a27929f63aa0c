//! Input proofs and handle derivation
//!
//! A handle commits to its ciphertext and to the contract/user pair it was
//! produced for. The proof carries the ciphertexts themselves so the network
//! can recompute every handle and reject inputs replayed for another pair.

use cipherkind_primitives::{Address, CiphertextHandle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tfhe::{CompactFheBool, CompactFheUint32, FheBool, FheUint32};

use crate::sdk::ValueKind;
use crate::{FheError, FheResult};

const HANDLE_DOMAIN: &str = "cipherkind.input-handle.v1";

/// Serialized compact ciphertext and its type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedCiphertext {
    pub kind: ValueKind,
    pub data: Vec<u8>,
}

/// Proof accompanying an encrypted input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof {
    pub contract: Address,
    pub user: Address,
    pub ciphertexts: Vec<PackedCiphertext>,
}

/// Derive the handle of ciphertext `index` within an input
pub fn derive_handle(
    data: &[u8],
    contract: &Address,
    user: &Address,
    index: usize,
) -> CiphertextHandle {
    let mut hasher = blake3::Hasher::new_derive_key(HANDLE_DOMAIN);
    hasher.update(contract.as_bytes());
    hasher.update(user.as_bytes());
    hasher.update(&(index as u32).to_le_bytes());
    hasher.update(data);
    CiphertextHandle::new(*hasher.finalize().as_bytes())
}

impl InputProof {
    pub fn new(contract: Address, user: Address, ciphertexts: Vec<PackedCiphertext>) -> Self {
        Self {
            contract,
            user,
            ciphertexts,
        }
    }

    /// Handles in input order
    pub fn handles(&self) -> Vec<CiphertextHandle> {
        self.ciphertexts
            .iter()
            .enumerate()
            .map(|(i, ct)| derive_handle(&ct.data, &self.contract, &self.user, i))
            .collect()
    }

    pub fn to_bytes(&self) -> FheResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| FheError::SerializationError(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> FheResult<Self> {
        bincode::deserialize(bytes).map_err(|e| FheError::InvalidProof(e.to_string()))
    }

    /// Check that `handle` belongs to this proof for `contract`/`user`.
    ///
    /// Returns the index of the matching ciphertext.
    pub fn verify(
        &self,
        handle: &CiphertextHandle,
        contract: &Address,
        user: &Address,
    ) -> FheResult<usize> {
        if &self.contract != contract {
            return Err(FheError::InvalidProof(format!(
                "proof is for contract {}, not {}",
                self.contract, contract
            )));
        }
        if &self.user != user {
            return Err(FheError::InvalidProof(format!(
                "proof is for account {}, not {}",
                self.user, user
            )));
        }

        self.handles()
            .iter()
            .position(|h| h == handle)
            .ok_or_else(|| FheError::InvalidProof(format!("handle {} not in proof", handle.short())))
    }

    /// Expand ciphertext `index` as an encrypted u32.
    ///
    /// Expansion may key-switch, so the server key must be installed on the
    /// calling thread.
    pub fn expand_u32(&self, index: usize) -> FheResult<FheUint32> {
        let compact: CompactFheUint32 = self.packed(index, ValueKind::U32)?;
        Ok(compact.expand())
    }

    /// Expand ciphertext `index` as an encrypted flag
    pub fn expand_bool(&self, index: usize) -> FheResult<FheBool> {
        let compact: CompactFheBool = self.packed(index, ValueKind::Bool)?;
        Ok(compact.expand())
    }

    fn packed<T: DeserializeOwned>(&self, index: usize, kind: ValueKind) -> FheResult<T> {
        let packed = self
            .ciphertexts
            .get(index)
            .ok_or_else(|| FheError::InvalidProof(format!("no ciphertext at index {index}")))?;

        if packed.kind != kind {
            return Err(FheError::InvalidCiphertext(format!(
                "expected {:?}, got {:?}",
                kind, packed.kind
            )));
        }

        bincode::deserialize(&packed.data)
            .map_err(|e| FheError::InvalidCiphertext(e.to_string()))
    }
}
