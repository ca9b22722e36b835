//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use techstore_cart::{CartManager, Recorder};
use techstore_kv::FileStore;
use techstore_observability::{LogFormat, LogLevel, SessionId, StructuredLogger};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Cart manager as used by the CLI: file-backed, messages collected for display.
pub type CliCartManager = CartManager<FileStore, Recorder, Recorder>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Path the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Structured logger for this invocation.
    pub logger: StructuredLogger,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output, log_format: Option<LogFormat>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };
        let config = config.with_env_overrides();

        let level = if output.is_verbose() {
            LogLevel::Debug
        } else {
            config.log.level
        };
        let logger = StructuredLogger::new(SessionId::generate())
            .with_min_level(level)
            .with_format(log_format.unwrap_or(config.log.format));
        output.debug(&format!("Session {}", logger.session_id()));

        Ok(Self {
            config,
            config_path,
            output,
            logger,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory holding the cart store.
    pub fn data_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.store.data_dir)
    }

    /// Open the cart manager over the file store.
    pub fn cart_manager(&self) -> Result<CliCartManager> {
        let dir = self.data_dir();
        self.output
            .debug(&format!("Using cart store in {}", dir.display()));
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open cart store in {}", dir.display()))?;

        Ok(CartManager::new(store)
            .with_key(self.config.store.cart_key.clone())
            .with_logger(self.logger.clone())
            .with_notifier(Recorder::new())
            .with_confirmer(Recorder::new()))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
