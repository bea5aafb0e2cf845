//! TOML file configuration structures.
//!
//! These structs directly map to the `settle-config.toml` file format.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use settle_sdk::catalog::{Chain, TokenSymbol};
use settle_sdk::link::SUCCESS_PATH;
use std::net::{Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    pub merchant: MerchantConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// Origin put in front of generated checkout links. Defaults to
    /// `http://{listen}`.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            public_base_url: None,
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

/// Simulation delays and session lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default = "default_detect_after_ms")]
    pub detect_after_ms: u64,
    #[serde(default = "default_confirm_after_ms")]
    pub confirm_after_ms: u64,
    #[serde(default = "default_redirect_after_ms")]
    pub redirect_after_ms: u64,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// USD amount for links without `amount`.
    #[serde(default = "default_amount")]
    pub default_amount: Decimal,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            detect_after_ms: default_detect_after_ms(),
            confirm_after_ms: default_confirm_after_ms(),
            redirect_after_ms: default_redirect_after_ms(),
            session_ttl_secs: default_session_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            default_amount: default_amount(),
        }
    }
}

fn default_detect_after_ms() -> u64 {
    3000
}

fn default_confirm_after_ms() -> u64 {
    2000
}

fn default_redirect_after_ms() -> u64 {
    2000
}

fn default_session_ttl_secs() -> u64 {
    30 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_amount() -> Decimal {
    Decimal::new(15000, 2)
}

/// Merchant configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantConfig {
    /// Human-readable merchant name.
    pub name: String,
    /// Public key put into generated checkout links.
    pub public_key: String,
    #[serde(default = "default_settlement_token")]
    pub settlement_token: TokenSymbol,
    #[serde(default = "default_settlement_chain")]
    pub settlement_chain: Chain,
    #[serde(default = "default_success_path")]
    pub success_path: String,
}

fn default_settlement_token() -> TokenSymbol {
    TokenSymbol::Usdc
}

fn default_settlement_chain() -> Chain {
    Chain::Polygon
}

fn default_success_path() -> String {
    SUCCESS_PATH.to_string()
}
