/// Configuration utilities - loading, validation, and access helpers
use super::schemas::{Config, EvmNetworkConfig};
use crate::errors::ConfigError;
use crate::logger::{self, LogTag};
use crate::networks::Network;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::path::Path;

/// Global configuration instance
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

/// Load configuration from [`CONFIG_FILE_PATH`] into the global CONFIG
pub fn load_config() -> Result<(), ConfigError> {
    load_config_from_path(CONFIG_FILE_PATH)
}

/// Load configuration from a specific TOML file
///
/// A missing file is not an error: defaults are used and a warning is logged.
/// Calling this again replaces the previously loaded configuration.
pub fn load_config_from_path(path: &str) -> Result<(), ConfigError> {
    let config = if Path::new(path).exists() {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            error: e.to_string(),
        })?;
        parse_config_str(&contents)?
    } else {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path),
        );
        Config::default()
    };

    install_config(config);
    Ok(())
}

/// Parse and validate a TOML document
pub fn parse_config_str(contents: &str) -> Result<Config, ConfigError> {
    let config: Config =
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Replace the global configuration
pub fn install_config(config: Config) {
    match CONFIG.get() {
        Some(lock) => *lock.write() = config,
        None => {
            if let Err(lock) = CONFIG.set(RwLock::new(config)) {
                // Lost an initialization race; overwrite with our value
                if let Some(existing) = CONFIG.get() {
                    *existing.write() = lock.into_inner();
                }
            }
        }
    }
}

/// Clone of the active configuration (defaults when nothing was loaded)
pub fn get_config_clone() -> Config {
    CONFIG
        .get()
        .map(|lock| lock.read().clone())
        .unwrap_or_default()
}

/// Run a closure against the active configuration without cloning it
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    match CONFIG.get() {
        Some(lock) => f(&lock.read()),
        None => f(&Config::default()),
    }
}

/// Reject URLs that cannot be parsed and zero timeouts
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let tron = &config.networks.tron;
    check_url("networks.tron.indexer_url", &tron.indexer_url)?;
    check_url("networks.tron.node_url", &tron.node_url)?;
    check_timeout("networks.tron.timeout_secs", tron.timeout_secs)?;

    for (name, evm) in [
        ("ethereum", &config.networks.ethereum),
        ("celo", &config.networks.celo),
    ] {
        if !evm.rpc_url.is_empty() {
            check_url(&format!("networks.{}.rpc_url", name), &evm.rpc_url)?;
        }
        if let Some(url) = &evm.indexer_url {
            check_url(&format!("networks.{}.indexer_url", name), url)?;
        }
        check_timeout(&format!("networks.{}.timeout_secs", name), evm.timeout_secs)?;
    }

    check_url("prices.base_url", &config.prices.base_url)?;
    check_timeout("prices.timeout_secs", config.prices.timeout_secs)?;
    Ok(())
}

fn check_url(field: &str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidField {
            field: field.to_string(),
            reason: format!("'{}' is not a valid URL: {}", value, e),
        })
}

fn check_timeout(field: &str, secs: u64) -> Result<(), ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidField {
            field: field.to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }
    Ok(())
}

impl Config {
    /// EVM settings for `network`, `None` for Tron
    pub fn evm(&self, network: Network) -> Option<&EvmNetworkConfig> {
        match network {
            Network::Tron => None,
            Network::Ethereum => Some(&self.networks.ethereum),
            Network::Celo => Some(&self.networks.celo),
        }
    }

    pub fn is_network_enabled(&self, network: Network) -> bool {
        match network {
            Network::Tron => self.networks.tron.enabled,
            Network::Ethereum => self.networks.ethereum.enabled,
            Network::Celo => self.networks.celo.enabled,
        }
    }
}

impl EvmNetworkConfig {
    /// Configured RPC URL, or the public default for `network`
    pub fn rpc_url_or_default(&self, network: Network) -> String {
        if self.rpc_url.trim().is_empty() {
            network.default_rpc_url().to_string()
        } else {
            self.rpc_url.clone()
        }
    }
}
