//! Encryption service lifecycle
//!
//! Owns the session-wide [`FheInstance`]. Initialization is an explicit state
//! machine:
//!
//! ```text
//! Uninitialized ──initialize()──▶ Initializing ──▶ Ready
//!                                      │   ▲
//!                          retries out │   │ initialize()
//!                                      ▼   │
//!                                     Failed
//! ```
//!
//! `Ready` is terminal for the session. An attempt dropped mid-flight lands
//! in `Failed`.

use std::sync::Arc;
use std::time::Duration;

use cipherkind_primitives::{Address, CiphertextHandle};
use parking_lot::RwLock;
use tokio::sync::Notify;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::input::EncryptedInputBuilder;
use crate::sdk::{ChainProvider, EncryptionSdk, FheInstance};
use crate::{FheError, FheResult};

/// Message shown once automatic retries are exhausted
pub const INIT_FAILED_MESSAGE: &str =
    "Failed to initialize encryption service. Retry initialization to try again.";

/// Message shown when no chain provider is attached
pub const PROVIDER_MISSING_MESSAGE: &str =
    "Chain provider not found. Please connect your wallet first.";

/// Bounded linear backoff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay unit; retry `n` waits `n * base_delay`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * retry
    }
}

/// Encryption service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Backoff for failed attempts
    pub retry: RetryPolicy,
    /// How long one attempt waits for the SDK to load
    pub sdk_wait: Duration,
    /// Poll interval while waiting for the SDK
    pub sdk_poll: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            sdk_wait: Duration::from_millis(2000),
            sdk_poll: Duration::from_millis(50),
        }
    }
}

/// Lifecycle state of the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceState {
    Uninitialized,
    Initializing,
    Ready,
    Failed { message: String },
}

/// Session-wide encryption client
pub struct EncryptionService {
    config: ServiceConfig,
    sdk: Arc<dyn EncryptionSdk>,
    provider: RwLock<Option<Arc<dyn ChainProvider>>>,
    state: RwLock<ServiceState>,
    instance: RwLock<Option<Arc<dyn FheInstance>>>,
    settled: Notify,
}

/// Held by the caller driving an initialization. If the attempt is dropped
/// before settling, the service moves to `Failed` so it can be retried.
struct InitGuard<'a> {
    service: &'a EncryptionService,
}

impl Drop for InitGuard<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.service.state.write();
            if *state == ServiceState::Initializing {
                warn!("Encryption service initialization abandoned");
                *state = ServiceState::Failed {
                    message: INIT_FAILED_MESSAGE.to_string(),
                };
            }
        }
        self.service.settled.notify_waiters();
    }
}

impl EncryptionService {
    /// Create an uninitialized service
    pub fn new(config: ServiceConfig, sdk: Arc<dyn EncryptionSdk>) -> Self {
        Self {
            config,
            sdk,
            provider: RwLock::new(None),
            state: RwLock::new(ServiceState::Uninitialized),
            instance: RwLock::new(None),
            settled: Notify::new(),
        }
    }

    /// Create a service with a provider already attached
    pub fn with_provider(
        config: ServiceConfig,
        sdk: Arc<dyn EncryptionSdk>,
        provider: Arc<dyn ChainProvider>,
    ) -> Self {
        let service = Self::new(config, sdk);
        service.attach_provider(provider);
        service
    }

    /// Attach the wallet's chain provider
    pub fn attach_provider(&self, provider: Arc<dyn ChainProvider>) {
        debug!(chain_id = provider.chain_id(), "Chain provider attached");
        *self.provider.write() = Some(provider);
    }

    /// Current state
    pub fn state(&self) -> ServiceState {
        self.state.read().clone()
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.read(), ServiceState::Ready)
    }

    pub fn is_initializing(&self) -> bool {
        matches!(*self.state.read(), ServiceState::Initializing)
    }

    /// User-facing failure message, if initialization failed
    pub fn error_message(&self) -> Option<String> {
        match &*self.state.read() {
            ServiceState::Failed { message } => Some(message.clone()),
            _ => None,
        }
    }

    /// Initialize the service.
    ///
    /// No-op once `Ready`. A call made while another is `Initializing` waits
    /// for that attempt and reports its outcome. A failed attempt is retried
    /// `max_retries` times with linear backoff, then the service moves to
    /// `Failed` and stays there until this is called again.
    pub async fn initialize(&self) -> FheResult<()> {
        let Some(_guard) = self.begin_initializing() else {
            return self.wait_settled().await;
        };

        let provider = self.provider.read().clone();
        let Some(provider) = provider else {
            warn!("Chain provider not found, waiting for wallet connection");
            self.fail(PROVIDER_MISSING_MESSAGE);
            return Err(FheError::ProviderUnavailable);
        };

        let policy = &self.config.retry;
        let mut retry = 0;

        loop {
            info!(attempt = retry + 1, "Starting encryption service initialization");

            match self.attempt(provider.clone()).await {
                Ok(instance) => {
                    *self.instance.write() = Some(instance);
                    *self.state.write() = ServiceState::Ready;
                    info!("Encryption service ready");
                    return Ok(());
                }
                Err(e) if retry < policy.max_retries => {
                    retry += 1;
                    let delay = policy.delay_for(retry);
                    warn!(
                        error = %e,
                        retry,
                        delay_ms = delay.as_millis() as u64,
                        "Encryption service initialization failed, retrying"
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    error!(error = %e, "Encryption service initialization failed");
                    self.fail(INIT_FAILED_MESSAGE);
                    return Err(FheError::InitializationFailed(e.to_string()));
                }
            }
        }
    }

    /// Session instance, if ready
    pub fn instance(&self) -> FheResult<Arc<dyn FheInstance>> {
        if !self.is_ready() {
            return Err(FheError::NotReady);
        }
        self.instance.read().clone().ok_or(FheError::NotReady)
    }

    /// Start building an encrypted input for `contract`, bound to `user`
    pub fn create_encrypted_input(
        &self,
        contract: Address,
        user: Address,
    ) -> FheResult<EncryptedInputBuilder> {
        Ok(EncryptedInputBuilder::new(self.instance()?, contract, user))
    }

    /// Decrypt `handle` for `user`.
    ///
    /// A response without a value is reported as `DecryptionFailed`.
    pub async fn user_decrypt(
        &self,
        handle: &CiphertextHandle,
        contract: &Address,
        user: &Address,
    ) -> FheResult<u64> {
        let instance = self.instance()?;

        match instance.user_decrypt(handle, contract, user).await {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(FheError::DecryptionFailed(format!(
                "no value returned for {}",
                handle.short()
            ))),
            Err(e) => {
                debug!(handle = %handle.short(), error = %e, "User decryption failed");
                Err(e)
            }
        }
    }

    /// Atomically move `Uninitialized`/`Failed` to `Initializing`
    fn begin_initializing(&self) -> Option<InitGuard<'_>> {
        let mut state = self.state.write();
        match *state {
            ServiceState::Ready | ServiceState::Initializing => None,
            ServiceState::Uninitialized | ServiceState::Failed { .. } => {
                *state = ServiceState::Initializing;
                Some(InitGuard { service: self })
            }
        }
    }

    /// Outcome of an initialization driven by another caller
    async fn wait_settled(&self) -> FheResult<()> {
        loop {
            let settled = self.settled.notified();
            tokio::pin!(settled);
            settled.as_mut().enable();

            match self.state() {
                ServiceState::Ready => return Ok(()),
                ServiceState::Failed { message } => {
                    return Err(FheError::InitializationFailed(message))
                }
                ServiceState::Uninitialized => {
                    return Err(FheError::InitializationFailed(
                        INIT_FAILED_MESSAGE.to_string(),
                    ))
                }
                ServiceState::Initializing => {
                    debug!("Waiting for in-flight encryption service initialization");
                    settled.await;
                }
            }
        }
    }

    fn fail(&self, message: &str) {
        *self.state.write() = ServiceState::Failed {
            message: message.to_string(),
        };
    }

    async fn attempt(&self, provider: Arc<dyn ChainProvider>) -> FheResult<Arc<dyn FheInstance>> {
        self.wait_for_sdk().await?;
        self.sdk.init_sdk().await?;
        debug!("SDK initialized, creating instance");
        self.sdk.create_instance(provider).await
    }

    async fn wait_for_sdk(&self) -> FheResult<()> {
        if self.sdk.is_loaded() {
            return Ok(());
        }

        let started = Instant::now();
        loop {
            sleep(self.config.sdk_poll).await;
            if self.sdk.is_loaded() {
                return Ok(());
            }
            if started.elapsed() >= self.config.sdk_wait {
                return Err(FheError::SdkUnavailable(
                    self.config.sdk_wait.as_millis() as u64,
                ));
            }
        }
    }
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService")
            .field("state", &self.state())
            .field("has_provider", &self.provider.read().is_some())
            .finish()
    }
}
