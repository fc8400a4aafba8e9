//! Coin Ledger tracks an in-game coin balance as a sequence of validated
//! readings, resolves daily goals and accrues debt against them.
//!
//! The domain, engine, store and config live in the `crates/` members; this
//! crate adds the stateful [`WalletManager`] facade and the interactive CLI.

pub mod cli;
pub mod errors;
pub mod manager;
pub mod utils;

use std::sync::Once;

use coin_config::{app_home, ConfigManager};

pub use errors::{CliError, WalletError};
pub use manager::WalletManager;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing, honouring the config file's `log_filter`.
pub fn init() {
    INIT_TRACING.call_once(|| {
        let config_path = app_home().join("config").join("config.json");
        let directive = ConfigManager::new(config_path)
            .load()
            .ok()
            .and_then(|config| config.log_filter);
        utils::init_tracing(directive.as_deref());
        tracing::debug!("Coin Ledger tracing initialized.");
    });
}
