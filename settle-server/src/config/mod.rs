//! Configuration module for settle-server.
//!
//! Handles loading configuration from the TOML file and CLI overrides,
//! validating it, and turning it into the runtime sections of
//! [`SharedConfig`].

pub mod file;

use crate::config::file::{
    FileConfig, MerchantConfig as FileMerchantConfig, SimulatorConfig as FileSimulatorConfig,
};
use settle_core::config::{MerchantConfig, ServerConfig, SharedConfig, SimulatorConfig};
use settle_core::simulator::SimulationTimings;
use settle_sdk::catalog::find_token;
use settle_sdk::link::PAYMENT_PATH;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid public_base_url: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub simulator: SimulatorConfig,
    pub merchant: MerchantConfig,
}

impl LoadedConfig {
    /// Convert into a SharedConfig with one store per section.
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig::new(self.server, self.simulator, self.merchant)
    }

    /// Swap the reloadable sections of `shared`.
    ///
    /// The listen address is bound once at startup and the success view is
    /// routed once; changed values for either are only picked up on restart.
    pub fn apply_to(mut self, shared: &SharedConfig) {
        let current = shared.server.get();
        if current.listen != self.server.listen {
            tracing::warn!(
                current = %current.listen,
                configured = %self.server.listen,
                "Listen address changed, restart to apply"
            );
        }
        shared.server.update(ServerConfig {
            listen: current.listen,
            public_base_url: self.server.public_base_url,
        });
        let current_success_path = shared.merchant.get().success_path;
        if current_success_path != self.merchant.success_path {
            tracing::warn!(
                current = %current_success_path,
                configured = %self.merchant.success_path,
                "Success path changed, restart to apply"
            );
            self.merchant.success_path = current_success_path;
        }
        shared.simulator.update(self.simulator);
        shared.merchant.update(self.merchant);
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    /// 4. Build the loaded configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        self.load_str(&config_content)
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn load_str(&self, content: &str) -> Result<LoadedConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        validate(&file_config)?;
        build_loaded_config(file_config)
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.merchant.public_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "merchant.public_key must not be empty".into(),
        ));
    }
    if config.simulator.sweep_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "simulator.sweep_interval_secs must be greater than zero".into(),
        ));
    }
    if config.simulator.default_amount.is_sign_negative() {
        return Err(ConfigError::ValidationError(
            "simulator.default_amount must not be negative".into(),
        ));
    }
    validate_success_path(&config.merchant.success_path)?;
    if find_token(config.merchant.settlement_token.as_str()).is_none() {
        return Err(ConfigError::ValidationError(format!(
            "merchant.settlement_token {} has no price",
            config.merchant.settlement_token.as_str()
        )));
    }
    Ok(())
}

/// The success view is mounted at this path next to the fixed routes, so
/// it must be a plain static path that none of them claims.
fn validate_success_path(path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "merchant.success_path must start with '/', got {path:?}"
        )));
    }
    if path.len() < 2 || path.contains(['?', '#', '{', '}', '*']) {
        return Err(ConfigError::ValidationError(format!(
            "merchant.success_path must be a plain path, got {path:?}"
        )));
    }
    if path == "/health" || path == PAYMENT_PATH || path == "/api" || path.starts_with("/api/") {
        return Err(ConfigError::ValidationError(format!(
            "merchant.success_path {path:?} collides with a built-in route"
        )));
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
    let public_base_url = match &file_config.server.public_base_url {
        Some(url) => Url::parse(url)?,
        None => Url::parse(&format!("http://{}", file_config.server.listen))?,
    };

    Ok(LoadedConfig {
        server: ServerConfig {
            listen: file_config.server.listen,
            public_base_url,
        },
        simulator: convert_simulator(&file_config.simulator),
        merchant: convert_merchant(file_config.merchant),
    })
}

fn convert_simulator(s: &FileSimulatorConfig) -> SimulatorConfig {
    SimulatorConfig {
        timings: SimulationTimings {
            detect_after: Duration::from_millis(s.detect_after_ms),
            confirm_after: Duration::from_millis(s.confirm_after_ms),
            redirect_after: Duration::from_millis(s.redirect_after_ms),
        },
        session_ttl: Duration::from_secs(s.session_ttl_secs),
        sweep_interval: Duration::from_secs(s.sweep_interval_secs),
        default_amount: s.default_amount,
    }
}

fn convert_merchant(m: FileMerchantConfig) -> MerchantConfig {
    MerchantConfig {
        settlement_token: m.settlement_token,
        settlement_chain: m.settlement_chain,
        success_path: m.success_path,
        ..MerchantConfig::new(m.name, m.public_key)
    }
}
