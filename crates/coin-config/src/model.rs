use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DATA_FILE_NAME: &str = "coin_ledger.json";

/// User-configurable preferences for the CLI and the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Overrides where the ledger blob lives. Defaults to `<home>/data/coin_ledger.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    /// `tracing` filter directive, e.g. `coin_ledger=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_recent_days")]
    pub recent_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            backup_retention: Self::default_backup_retention(),
            log_filter: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
            recent_days: Self::default_recent_days(),
        }
    }
}

impl Config {
    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_recent_days() -> u32 {
        7
    }

    pub fn resolve_data_file(&self, home: &Path) -> PathBuf {
        match &self.data_file {
            Some(path) => path.clone(),
            None => home.join("data").join(DATA_FILE_NAME),
        }
    }

    pub fn effective_retention(&self) -> usize {
        self.backup_retention.max(1)
    }
}
