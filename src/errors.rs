use std::result::Result as StdResult;

use coin_config::ConfigError;
use coin_core::CoreError;
use thiserror::Error;

/// Unified error type for the wallet facade.
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Wallet not initialized. Use `init <amount>` first.")]
    NotInitialized,
    #[error("Wallet already initialized with {records} record(s)")]
    AlreadyInitialized { records: usize },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, WalletError>;

impl WalletError {
    /// True when the wallet refused the operation and nothing was written.
    pub fn is_rejection(&self) -> bool {
        match self {
            WalletError::InvalidInput(_) | WalletError::AlreadyInitialized { .. } => true,
            WalletError::Core(err) => err.is_validation(),
            _ => false,
        }
    }
}

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<ConfigError> for WalletError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => WalletError::Core(CoreError::Io(io)),
            ConfigError::Serde(message) => WalletError::Config(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(WalletError::from(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::from(WalletError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}
