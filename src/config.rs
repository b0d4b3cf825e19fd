use alloy::primitives::Address;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::adapters::{DPOS_CONTRACT_ADDRESS, TARAXA_MAINNET_RPC};
use crate::error::{RestakerError, Result};
use crate::strategy::RestakeConfig;

/// Validator that receives the delegation when none is configured
pub const DEFAULT_TARGET_VALIDATOR: &str = "0xe50b5452B2E8435404DBe06E6a05410C47B7583D";

/// Main configuration structure
///
/// The signing key is deliberately not part of it; see
/// [`crate::signing::Wallet::from_env`].
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub chain: ChainConfig,
    pub delegation: DelegationConfig,
    #[serde(default)]
    pub settlement: SettlementConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Discover and plan only; submit nothing
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Staking (DPOS) contract address
    pub staking_contract: String,
    /// Gas limit for every transaction
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
}

fn default_gas_limit() -> u64 {
    300_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct DelegationConfig {
    /// Validator that receives the re-delegated balance
    pub target_validator: String,
    /// Delegate only when the balance is strictly above this many whole units
    #[serde(default = "default_min_whole_units")]
    pub min_whole_units: u64,
}

fn default_min_whole_units() -> u64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Pending-nonce polling interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Give up waiting after this many seconds (unset = wait forever)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_poll_interval() -> u64 {
    500
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Also write a daily-rolling log file here
    #[serde(default)]
    pub dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

fn parse_address(field: &str, raw: &str) -> std::result::Result<Address, String> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| format!("{field} is not a valid address ({raw}): {e}"))
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> std::result::Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("chain.rpc_url", TARAXA_MAINNET_RPC)?
            .set_default("chain.staking_contract", DPOS_CONTRACT_ADDRESS)?
            .set_default("chain.gas_limit", default_gas_limit())?
            .set_default("delegation.target_validator", DEFAULT_TARGET_VALIDATOR)?
            .set_default("delegation.min_whole_units", default_min_whole_units())?
            .set_default("settlement.poll_interval_ms", default_poll_interval())?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("dry_run", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/testnet.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("RESTAKER_ENV").unwrap_or_else(|_| "mainnet".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (RESTAKER__CHAIN__RPC_URL, etc.)
            .add_source(
                Environment::with_prefix("RESTAKER")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match url::Url::parse(&self.chain.rpc_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(format!(
                "chain.rpc_url must be http(s), got scheme {}",
                url.scheme()
            )),
            Err(e) => errors.push(format!("chain.rpc_url is invalid: {e}")),
        }

        if let Err(e) = parse_address("chain.staking_contract", &self.chain.staking_contract) {
            errors.push(e);
        }

        match parse_address("delegation.target_validator", &self.delegation.target_validator) {
            Ok(addr) if addr == Address::ZERO => {
                errors.push("delegation.target_validator must not be the zero address".to_string())
            }
            Ok(_) => {}
            Err(e) => errors.push(e),
        }

        if self.chain.gas_limit == 0 {
            errors.push("chain.gas_limit must be positive".to_string());
        }

        if self.settlement.poll_interval_ms == 0 {
            errors.push("settlement.poll_interval_ms must be positive".to_string());
        }

        if self.settlement.timeout_secs == Some(0) {
            errors.push("settlement.timeout_secs must be positive when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn staking_contract(&self) -> Result<Address> {
        parse_address("chain.staking_contract", &self.chain.staking_contract)
            .map_err(RestakerError::InvalidConfig)
    }

    /// Workflow configuration derived from this file/env configuration
    pub fn restake_config(&self) -> Result<RestakeConfig> {
        let target_validator =
            parse_address("delegation.target_validator", &self.delegation.target_validator)
                .map_err(RestakerError::InvalidConfig)?;

        Ok(RestakeConfig {
            target_validator,
            min_delegation_whole_units: self.delegation.min_whole_units,
            poll_interval: Duration::from_millis(self.settlement.poll_interval_ms),
            settlement_timeout: self.settlement.timeout_secs.map(Duration::from_secs),
            gas_limit: self.chain.gas_limit,
            dry_run: self.dry_run,
        })
    }
}
