//! Runtime configuration types for the demo checkout.
//!
//! These are the validated values the server works with. Reading and
//! parsing the TOML file is the server crate's job.

mod config_store;
mod merchant;
mod server;
mod simulator;

pub use config_store::{ConfigStore, ConfigWatcher};
pub use merchant::MerchantConfig;
pub use server::ServerConfig;
pub use simulator::SimulatorConfig;

/// Shared configuration with one store per section.
///
/// Sections are swapped independently on reload; consumers that need to
/// react (the session reaper) subscribe to their section only.
#[derive(Clone)]
pub struct SharedConfig {
    /// Listen address and public origin.
    pub server: ConfigStore<ServerConfig>,
    /// Simulation delays and session lifetime.
    pub simulator: ConfigStore<SimulatorConfig>,
    /// Merchant identity and settlement preference.
    pub merchant: ConfigStore<MerchantConfig>,
}

impl SharedConfig {
    pub fn new(server: ServerConfig, simulator: SimulatorConfig, merchant: MerchantConfig) -> Self {
        Self {
            server: ConfigStore::new(server),
            simulator: ConfigStore::new(simulator),
            merchant: ConfigStore::new(merchant),
        }
    }
}
