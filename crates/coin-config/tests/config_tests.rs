use std::path::{Path, PathBuf};

use coin_config::{Config, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_uses_documented_values() {
    let cfg = Config::default();
    assert_eq!(cfg.backup_retention, 5);
    assert!(cfg.ui_color_enabled);
    assert_eq!(cfg.recent_days, 7);
    assert_eq!(
        cfg.resolve_data_file(Path::new("/home/x/.coin_ledger")),
        PathBuf::from("/home/x/.coin_ledger/data/coin_ledger.json")
    );
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert_eq!(manager.load().expect("load"), Config::default());
    assert_eq!(
        manager.config_path(),
        dir.path().join("config").join("config.json")
    );
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let cfg = Config {
        data_file: Some(dir.path().join("elsewhere.json")),
        backup_retention: 0,
        log_filter: Some("coin_ledger=debug".into()),
        ui_color_enabled: false,
        recent_days: 14,
    };

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.effective_retention(), 1);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "ui_color_enabled": false }"#).expect("write");
    let loaded = ConfigManager::new(path).load().expect("load");
    assert!(!loaded.ui_color_enabled);
    assert_eq!(loaded.backup_retention, 5);
    assert!(loaded.data_file.is_none());
}
