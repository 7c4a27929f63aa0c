//! Client Configuration
//!
//! Handles loading and saving client configuration from TOML files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cipherkind_client::DEFAULT_TARGET_CENTS;
use cipherkind_devnet::LOCAL_CHAIN_ID;
use cipherkind_fhe::{RetryPolicy, ServiceConfig};
use cipherkind_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sepolia testnet chain id
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Full client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CipherKindConfig {
    /// Chain connection
    #[serde(default)]
    pub network: NetworkSettings,

    /// Donation contract
    #[serde(default)]
    pub contract: ContractSettings,

    /// Wallet account
    #[serde(default)]
    pub wallet: WalletSettings,

    /// Encryption service
    #[serde(default)]
    pub encryption: EncryptionSettings,

    /// Campaign display
    #[serde(default)]
    pub campaign: CampaignSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl CipherKindConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Create configuration for a specific network
    pub fn for_network(network: &str) -> Result<Self, ConfigError> {
        match network {
            "local" => Ok(Self::local()),
            "sepolia" => Ok(Self::sepolia()),
            other => Err(ConfigError::Invalid(format!("Unknown network: {other}"))),
        }
    }

    /// Local devnet configuration
    pub fn local() -> Self {
        Self::default()
    }

    /// Sepolia configuration; the RPC endpoint must be filled in
    pub fn sepolia() -> Self {
        Self {
            network: NetworkSettings {
                name: "sepolia".to_string(),
                rpc_url: None,
                relayer_url: None,
                chain_id: SEPOLIA_CHAIN_ID,
            },
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.chain_id == 0 {
            return Err(ConfigError::Invalid("Chain id must be non-zero".to_string()));
        }

        if self.network.name == "sepolia" && self.network.rpc_url.is_none() {
            return Err(ConfigError::Invalid(
                "Sepolia requires network.rpc_url".to_string(),
            ));
        }

        if self.encryption.sdk_poll_ms == 0 || self.encryption.sdk_poll_ms > self.encryption.sdk_wait_ms
        {
            return Err(ConfigError::Invalid(
                "encryption.sdk_poll_ms must be between 1 and sdk_wait_ms".to_string(),
            ));
        }

        if self.campaign.default_target_cents == 0 {
            return Err(ConfigError::Invalid(
                "campaign.default_target_cents must be greater than 0".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::Invalid(format!(
                "Unknown log format: {}",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// RPC endpoint, required by every command that talks to the chain
    pub fn rpc_url(&self) -> Result<&str, ConfigError> {
        self.network
            .rpc_url
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("network.rpc_url is not set".to_string()))
    }

    /// Relayer endpoint; the RPC endpoint unless configured separately
    pub fn relayer_url(&self) -> Result<&str, ConfigError> {
        match self.network.relayer_url.as_deref() {
            Some(url) => Ok(url),
            None => self.rpc_url(),
        }
    }
}

/// Chain connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Network name (local, sepolia)
    pub name: String,

    /// JSON-RPC endpoint
    pub rpc_url: Option<String>,

    /// Relayer endpoint, if different from the RPC endpoint
    pub relayer_url: Option<String>,

    pub chain_id: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            rpc_url: Some(format!(
                "http://127.0.0.1:{}",
                cipherkind_gateway::DEFAULT_RPC_PORT
            )),
            relayer_url: None,
            chain_id: LOCAL_CHAIN_ID,
        }
    }
}

/// Contract settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractSettings {
    /// Deployed address; asked from the endpoint when unset
    pub address: Option<Address>,
}

/// Wallet settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletSettings {
    /// Account used as sender and decryption identity
    pub account: Option<Address>,
}

/// Encryption service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionSettings {
    /// Retries after the first initialization attempt
    pub max_retries: u32,

    /// Backoff unit in milliseconds
    pub base_delay_ms: u64,

    /// How long one attempt waits for the SDK
    pub sdk_wait_ms: u64,

    pub sdk_poll_ms: u64,
}

impl Default for EncryptionSettings {
    fn default() -> Self {
        let service = ServiceConfig::default();
        Self {
            max_retries: service.retry.max_retries,
            base_delay_ms: service.retry.base_delay.as_millis() as u64,
            sdk_wait_ms: service.sdk_wait.as_millis() as u64,
            sdk_poll_ms: service.sdk_poll.as_millis() as u64,
        }
    }
}

impl EncryptionSettings {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            retry: RetryPolicy {
                max_retries: self.max_retries,
                base_delay: Duration::from_millis(self.base_delay_ms),
            },
            sdk_wait: Duration::from_millis(self.sdk_wait_ms),
            sdk_poll: Duration::from_millis(self.sdk_poll_ms),
        }
    }
}

/// Campaign display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignSettings {
    /// Target used for progress bars
    pub default_target_cents: u64,
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            default_target_cents: DEFAULT_TARGET_CENTS,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,

    /// Output format (text, json)
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Get default data directory
pub fn default_data_dir(network: &str) -> PathBuf {
    let base = directories::ProjectDirs::from("org", "cipherkind", "cipherkind")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".cipherkind"));

    base.join(network)
}

/// Get default config file path
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Resolve and load the configuration.
///
/// An explicit path must exist; otherwise the default location is used if
/// present and the local preset if not.
pub fn resolve(
    config_path: Option<&Path>,
    data_dir: Option<&Path>,
) -> Result<CipherKindConfig, ConfigError> {
    if let Some(path) = config_path {
        return CipherKindConfig::load(path);
    }

    let data_dir = data_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_data_dir("local"));
    let path = default_config_path(&data_dir);

    if path.exists() {
        CipherKindConfig::load(&path)
    } else {
        Ok(CipherKindConfig::local())
    }
}
