use std::time::Duration;

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment};
use jamii_rpc::TESTNET_FULLNODE_URL;
use jamii_types::{
    Address, ContractConfig, DEFAULT_ADMIN_CAP_ID, DEFAULT_MODULE_NAME, DEFAULT_PACKAGE_ID,
    DEFAULT_REGISTRY_ID,
};
use jamii_utils::{LogFormat, EXPLORER_TXBLOCK_BASE_URL};
use serde::Deserialize;

use crate::{ExecutorConfig, DEFAULT_CHAIN, DEFAULT_GAS_BUDGET};

/// The default delay before cached data is refetched after a successful write.
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_secs(2);

/// Client settings, read from `JAMII_*` environment variables on top of testnet defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub rpc_url: String,
    pub network: String,
    pub chain: String,
    pub package_id: Address,
    pub module_name: String,
    pub registry_id: Address,
    pub admin_cap_id: Address,
    pub groups_owner: Option<Address>,
    pub wallet_url: String,
    pub account: Option<Address>,
    pub gas_budget: u64,
    pub confirmation_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub refresh_delay_ms: u64,
    pub explorer_url: String,
    pub log_format: LogFormat,
}

impl Settings {
    /// Loads the settings from the environment.
    pub fn new() -> Result<Self, ConfigError> {
        let config = Self::builder()?.add_source(Environment::with_prefix("JAMII")).build()?;

        config.try_deserialize()
    }

    /// A builder preloaded with the defaults, for layering further sources.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("rpc_url", TESTNET_FULLNODE_URL)?
            .set_default("network", "testnet")?
            .set_default("chain", DEFAULT_CHAIN)?
            .set_default("package_id", DEFAULT_PACKAGE_ID)?
            .set_default("module_name", DEFAULT_MODULE_NAME)?
            .set_default("registry_id", DEFAULT_REGISTRY_ID)?
            .set_default("admin_cap_id", DEFAULT_ADMIN_CAP_ID)?
            .set_default("wallet_url", "http://127.0.0.1:9545/sign-and-execute")?
            .set_default("gas_budget", DEFAULT_GAS_BUDGET.to_string())?
            .set_default("confirmation_timeout_secs", 60_i64)?
            .set_default("poll_interval_ms", 2_000_i64)?
            .set_default("refresh_delay_ms", 2_000_i64)?
            .set_default("explorer_url", EXPLORER_TXBLOCK_BASE_URL)?
            .set_default("log_format", "Minimal")
    }

    /// The contract identifiers.
    #[must_use]
    pub fn contract(&self) -> ContractConfig {
        ContractConfig {
            package_id: self.package_id,
            module_name: self.module_name.clone(),
            registry_id: self.registry_id,
            admin_cap_id: self.admin_cap_id,
        }
    }

    /// The settings shared by the hooks and pages.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            contract: self.contract(),
            groups_owner: self.groups_owner,
            executor: ExecutorConfig {
                chain: self.chain.clone(),
                gas_budget: self.gas_budget,
                confirmation_timeout: Duration::from_secs(self.confirmation_timeout_secs),
                poll_interval: Duration::from_millis(self.poll_interval_ms),
            },
            refresh_delay: Duration::from_millis(self.refresh_delay_ms),
            explorer: ExplorerConfig {
                base_url: self.explorer_url.clone(),
                network: self.network.clone(),
            },
        }
    }
}

/// Where transaction links point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// The transaction-block base URL.
    pub base_url: String,
    /// The `network` query value.
    pub network: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self { base_url: EXPLORER_TXBLOCK_BASE_URL.to_string(), network: "testnet".to_string() }
    }
}

/// Everything an [`crate::AppContext`] needs besides its wallet and reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// The contract identifiers.
    pub contract: ContractConfig,
    /// The owner under which groups and proposals are listed; the registry when unset.
    pub groups_owner: Option<Address>,
    /// Execution settings.
    pub executor: ExecutorConfig,
    /// The delay before cached data is refetched after a successful write.
    pub refresh_delay: Duration,
    /// Explorer links.
    pub explorer: ExplorerConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            contract: ContractConfig::default(),
            groups_owner: None,
            executor: ExecutorConfig::default(),
            refresh_delay: DEFAULT_REFRESH_DELAY,
            explorer: ExplorerConfig::default(),
        }
    }
}
