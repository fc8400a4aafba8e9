//! coin-config
//!
//! Persistent user preferences for the coin ledger tools.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{app_home, ConfigManager, HOME_ENV_VAR};
pub use model::Config;
