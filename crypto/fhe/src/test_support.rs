//! Test doubles for the SDK seams

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cipherkind_primitives::{Address, CiphertextHandle};
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::input::EncryptedInput;
use crate::sdk::{ChainProvider, EncryptionSdk, FheInstance, InputValue};
use crate::{FheError, FheResult};

/// Instance that records what it was asked to encrypt
#[derive(Default)]
pub struct RecordingInstance {
    encrypted: Mutex<Vec<Vec<InputValue>>>,
    plaintexts: Mutex<HashMap<CiphertextHandle, u64>>,
    counter: AtomicU64,
}

impl RecordingInstance {
    pub fn encrypted_values(&self) -> Vec<Vec<InputValue>> {
        self.encrypted.lock().clone()
    }

    pub fn set_plaintext(&self, handle: CiphertextHandle, value: u64) {
        self.plaintexts.lock().insert(handle, value);
    }
}

#[async_trait]
impl FheInstance for RecordingInstance {
    async fn encrypt(
        &self,
        _contract: &Address,
        _user: &Address,
        values: &[InputValue],
    ) -> FheResult<EncryptedInput> {
        self.encrypted.lock().push(values.to_vec());

        let handles = values
            .iter()
            .map(|_| {
                let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
                n.to_be_bytes().to_vec()
            })
            .collect();

        Ok(EncryptedInput {
            handles,
            input_proof: vec![0xff; 8],
        })
    }

    async fn user_decrypt(
        &self,
        handle: &CiphertextHandle,
        _contract: &Address,
        _user: &Address,
    ) -> FheResult<Option<u64>> {
        Ok(self.plaintexts.lock().get(handle).copied())
    }
}

/// SDK with scripted failures
pub struct MockSdk {
    instance: Arc<RecordingInstance>,
    loaded: bool,
    init_delay: Option<Duration>,
    failures_left: AtomicU32,
    init_calls: AtomicU32,
    create_calls: Mutex<Vec<Instant>>,
}

impl Default for MockSdk {
    fn default() -> Self {
        Self::with_instance(Arc::new(RecordingInstance::default()))
    }
}

impl MockSdk {
    pub fn with_instance(instance: Arc<RecordingInstance>) -> Self {
        Self {
            instance,
            loaded: true,
            init_delay: None,
            failures_left: AtomicU32::new(0),
            init_calls: AtomicU32::new(0),
            create_calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail the first `n` instance creations
    pub fn failing_instances(self, n: u32) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    pub fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = Some(delay);
        self
    }

    pub fn never_loaded(mut self) -> Self {
        self.loaded = false;
        self
    }

    pub fn init_calls(&self) -> u32 {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn create_call_times(&self) -> Vec<Instant> {
        self.create_calls.lock().clone()
    }
}

#[async_trait]
impl EncryptionSdk for MockSdk {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    async fn init_sdk(&self) -> FheResult<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.init_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn create_instance(
        &self,
        _provider: Arc<dyn ChainProvider>,
    ) -> FheResult<Arc<dyn FheInstance>> {
        self.create_calls.lock().push(Instant::now());

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(FheError::RelayerError("relayer unreachable".into()));
        }

        Ok(self.instance.clone())
    }
}
