//! Encrypted input builder

use std::sync::Arc;

use cipherkind_primitives::{encode_handle_hex, normalize_handle, Address, CiphertextHandle};
use tracing::debug;

use crate::sdk::{FheInstance, InputValue};
use crate::{FheError, FheResult};

/// Output of [`EncryptedInputBuilder::encrypt`]
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedInput {
    /// Raw handles as produced by the SDK, one per added value
    pub handles: Vec<Vec<u8>>,
    /// Proof covering every handle
    pub input_proof: Vec<u8>,
}

impl EncryptedInput {
    /// Handle `index` normalized to 32 bytes
    pub fn handle(&self, index: usize) -> Option<CiphertextHandle> {
        self.handles.get(index).map(|raw| normalize_handle(raw))
    }

    /// Handle `index` rendered as a call argument
    pub fn handle_hex(&self, index: usize) -> Option<String> {
        self.handles.get(index).map(|raw| encode_handle_hex(raw))
    }
}

impl std::fmt::Debug for EncryptedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedInput")
            .field("handles", &self.handles.len())
            .field("proof_size", &self.input_proof.len())
            .finish()
    }
}

/// Collects typed values for one contract/user pair, then encrypts them
pub struct EncryptedInputBuilder {
    instance: Arc<dyn FheInstance>,
    contract: Address,
    user: Address,
    values: Vec<InputValue>,
}

impl EncryptedInputBuilder {
    pub(crate) fn new(instance: Arc<dyn FheInstance>, contract: Address, user: Address) -> Self {
        Self {
            instance,
            contract,
            user,
            values: Vec::new(),
        }
    }

    /// Add a 32-bit unsigned value (currency amounts in cents)
    pub fn add32(&mut self, value: u32) -> &mut Self {
        self.values.push(InputValue::U32(value));
        self
    }

    /// Add a 64-bit unsigned value
    pub fn add64(&mut self, value: u64) -> &mut Self {
        self.values.push(InputValue::U64(value));
        self
    }

    /// Add an encrypted flag
    pub fn add_bool(&mut self, value: bool) -> &mut Self {
        self.values.push(InputValue::Bool(value));
        self
    }

    /// Values added so far
    pub fn values(&self) -> &[InputValue] {
        &self.values
    }

    /// Encrypt everything added so far
    pub async fn encrypt(self) -> FheResult<EncryptedInput> {
        if self.values.is_empty() {
            return Err(FheError::EmptyInput);
        }

        debug!(
            contract = %self.contract,
            user = %self.user,
            values = self.values.len(),
            "Encrypting input"
        );

        let input = self
            .instance
            .encrypt(&self.contract, &self.user, &self.values)
            .await?;

        if input.handles.len() != self.values.len() {
            return Err(FheError::EncryptionFailed(format!(
                "expected {} handles, SDK returned {}",
                self.values.len(),
                input.handles.len()
            )));
        }

        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingInstance;

    #[tokio::test]
    async fn test_builder_forwards_values() {
        let instance = Arc::new(RecordingInstance::default());
        let mut builder =
            EncryptedInputBuilder::new(instance.clone(), Address([1u8; 20]), Address([2u8; 20]));
        builder.add32(2550).add64(7).add_bool(true);

        let input = builder.encrypt().await.unwrap();

        assert_eq!(input.handles.len(), 3);
        assert_eq!(
            instance.encrypted_values(),
            vec![vec![
                InputValue::U32(2550),
                InputValue::U64(7),
                InputValue::Bool(true)
            ]]
        );
    }

    #[tokio::test]
    async fn test_empty_builder_rejected() {
        let instance = Arc::new(RecordingInstance::default());
        let builder = EncryptedInputBuilder::new(instance, Address::ZERO, Address::ZERO);

        assert_eq!(builder.encrypt().await.unwrap_err(), FheError::EmptyInput);
    }

    #[test]
    fn test_handle_normalization() {
        let input = EncryptedInput {
            handles: vec![vec![0xaa; 4], vec![0xbb; 40]],
            input_proof: vec![],
        };

        assert_eq!(input.handle_hex(0).unwrap().len(), 66);
        assert_eq!(&input.handle(0).unwrap().0[..4], &[0xaa; 4]);
        assert_eq!(input.handle(1).unwrap().0, [0xbb; 32]);
        assert!(input.handle(2).is_none());
    }
}
