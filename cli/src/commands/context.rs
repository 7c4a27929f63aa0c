//! Session wiring shared by the chain-facing commands

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use cipherkind_client::{NoticeLevel, Session, Wallet};
use cipherkind_fhe::{EncryptionService, HttpRelayer, RelayerSdk, RpcProvider};
use cipherkind_gateway::{ContractGateway, RpcGateway};
use cipherkind_primitives::Address;
use tracing::info;

use crate::config::{self, CipherKindConfig};

/// Loaded configuration plus a connected session
pub struct Context {
    pub config: CipherKindConfig,
    pub session: Session,
}

impl Context {
    /// Build a session from configuration.
    ///
    /// `account` overrides the configured wallet account. Encryption is
    /// initialized only if `with_encryption` is set.
    pub async fn connect(
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
        account: Option<Address>,
        with_encryption: bool,
    ) -> anyhow::Result<Self> {
        let config = config::resolve(config_path.as_deref(), data_dir.as_deref())?;
        let rpc_url = config.rpc_url()?.to_string();

        let gateway = match config.contract.address {
            Some(address) => RpcGateway::new(&rpc_url, address)?,
            None => RpcGateway::discover(&rpc_url)
                .await
                .with_context(|| format!("Could not reach contract at {rpc_url}"))?,
        };
        info!(contract = %gateway.contract_address(), url = %rpc_url, "Using contract");

        let relayer = HttpRelayer::new(config.relayer_url()?)?;
        let sdk = RelayerSdk::new(Arc::new(relayer));
        let encryption = EncryptionService::new(config.encryption.service_config(), Arc::new(sdk));

        let wallet = Wallet::new();
        if let Some(account) = account.or(config.wallet.account) {
            wallet.connect(account, RpcProvider::new(config.network.chain_id, rpc_url));
        }

        let session = Session::new(Arc::new(encryption), Arc::new(gateway), Arc::new(wallet));

        if with_encryption {
            session.initialize_encryption().await?;
        }

        Ok(Self { config, session })
    }

    /// Print and clear pending notices
    pub fn print_notices(&self) {
        for notice in self.session.notices().drain() {
            let marker = match notice.level {
                NoticeLevel::Success => "✅",
                NoticeLevel::Error => "❌",
                NoticeLevel::Info => "ℹ️ ",
            };
            println!("{} {}: {}", marker, notice.title, notice.message);
        }
    }
}
