//! CLI configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use techstore_cart::{Catalog, Product, CART_KEY};
use techstore_monitor::{Endpoints, PollIntervals, DEFAULT_API_BASE, DEFAULT_BRIDGE_BASE};
use techstore_observability::{LogFormat, LogLevel};

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["techstore.toml", ".techstore.toml", "techstore.json"];

/// Environment variable that overrides `store.data_dir`.
pub const DATA_DIR_ENV: &str = "TECHSTORE_DATA_DIR";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart storage.
    #[serde(default)]
    pub store: StoreConfig,

    /// Backend and bridge endpoints.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Logging.
    #[serde(default)]
    pub log: LogConfig,

    /// Products that `add` can look up by id.
    #[serde(default)]
    pub catalog: Vec<Product>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            self.store.data_dir = PathBuf::from(dir);
        }
        self
    }

    /// The configured product list.
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.catalog.clone())
    }

    /// Monitor endpoints.
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            api_base: self.monitor.api_base.clone(),
            bridge_base: self.monitor.bridge_base.clone(),
            timeout: Duration::from_secs(self.monitor.timeout_secs),
        }
    }

    /// Dashboard refresh intervals.
    pub fn intervals(&self) -> PollIntervals {
        PollIntervals {
            status: Duration::from_secs(self.monitor.status_interval_secs.max(1)),
            qr: Duration::from_secs(self.monitor.qr_interval_secs.max(1)),
        }
    }

    /// Read a single value by dotted key, rendered as a string.
    pub fn get_value(&self, key: &str) -> Result<String> {
        let value = match key {
            "store.data_dir" => self.store.data_dir.display().to_string(),
            "store.cart_key" => self.store.cart_key.clone(),
            "monitor.api_base" => self.monitor.api_base.clone(),
            "monitor.bridge_base" => self.monitor.bridge_base.clone(),
            "monitor.status_interval_secs" => self.monitor.status_interval_secs.to_string(),
            "monitor.qr_interval_secs" => self.monitor.qr_interval_secs.to_string(),
            "monitor.timeout_secs" => self.monitor.timeout_secs.to_string(),
            "log.level" => self.log.level.to_string().to_lowercase(),
            "log.format" => match self.log.format {
                LogFormat::Json => "json".to_string(),
                LogFormat::Human => "human".to_string(),
            },
            _ => bail!("Unknown config key: {}", key),
        };
        Ok(value)
    }
}

/// Where the cart is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the store file (default: .techstore).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Key the cart is saved under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".techstore")
}

fn default_cart_key() -> String {
    CART_KEY.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cart_key: default_cart_key(),
        }
    }
}

/// Backend and bridge endpoints and refresh intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_bridge_base")]
    pub bridge_base: String,

    /// General status refresh, in seconds.
    #[serde(default = "default_status_interval")]
    pub status_interval_secs: u64,

    /// QR refresh while waiting for pairing, in seconds.
    #[serde(default = "default_qr_interval")]
    pub qr_interval_secs: u64,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_bridge_base() -> String {
    DEFAULT_BRIDGE_BASE.to_string()
}

fn default_status_interval() -> u64 {
    10
}

fn default_qr_interval() -> u64 {
    5
}

fn default_timeout() -> u64 {
    5
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            bridge_base: default_bridge_base(),
            status_interval_secs: default_status_interval(),
            qr_interval_secs: default_qr_interval(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,
}

/// Generate a default techstore.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# TechStore configuration

[store]
data_dir = ".techstore"
cart_key = "{cart_key}"

[monitor]
api_base = "{api_base}"
bridge_base = "{bridge_base}"
status_interval_secs = 10
qr_interval_secs = 5
timeout_secs = 5

[log]
level = "info"
format = "human"

[[catalog]]
id = 1
name = "Laptop Pro 14"
price = 8999

[[catalog]]
id = 2
name = "Wireless Mouse"
price = 149

[[catalog]]
id = 3
name = "Mechanical Keyboard"
price = 699

[[catalog]]
id = 4
name = "27in Monitor"
price = 2499
"#,
        cart_key = CART_KEY,
        api_base = DEFAULT_API_BASE,
        bridge_base = DEFAULT_BRIDGE_BASE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.store.cart_key, "techstore_cart");
        assert_eq!(config.store.data_dir, PathBuf::from(".techstore"));
        assert_eq!(config.intervals(), PollIntervals::default());
        assert_eq!(config.endpoints(), Endpoints::default());
        assert!(config.catalog.is_empty());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        let catalog = config.catalog();
        assert_eq!(catalog.products().len(), 4);
        assert_eq!(catalog.find(2).unwrap().price, 149);
        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(config.log.format, LogFormat::Human);
    }

    #[test]
    fn test_load_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("techstore.json");
        std::fs::write(
            &path,
            r#"{"monitor": {"api_base": "http://10.0.0.2:5000"}, "log": {"level": "debug"}}"#,
        )
        .unwrap();

        let config = CliConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.monitor.api_base, "http://10.0.0.2:5000");
        assert_eq!(config.monitor.bridge_base, DEFAULT_BRIDGE_BASE);
        assert_eq!(config.log.level, LogLevel::Debug);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config: CliConfig = toml::from_str("[monitor]\nqr_interval_secs = 0\n").unwrap();
        assert_eq!(config.intervals().qr, Duration::from_secs(1));
    }

    #[test]
    fn test_get_value() {
        let config = CliConfig::default();
        assert_eq!(config.get_value("store.cart_key").unwrap(), "techstore_cart");
        assert_eq!(config.get_value("log.level").unwrap(), "info");
        assert!(config.get_value("nope").is_err());
    }
}
