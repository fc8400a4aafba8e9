use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info};

use coin_core::{storage::AppDataStorage, CoreError, MigrationService};
use coin_domain::AppData;

const JSON_EXTENSION: &str = "json";
const BACKUP_DIR_NAME: &str = "backups";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%3f";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Single-file JSON persistence for the ledger blob, with rolling backups
/// kept in a `backups/` directory next to the data file.
#[derive(Debug, Clone)]
pub struct JsonAppDataStorage {
    path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

/// A backup copy of a previous data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: Option<NaiveDateTime>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl JsonAppDataStorage {
    pub fn new(path: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(path, DEFAULT_RETENTION)
    }

    pub fn with_retention(path: PathBuf, retention: usize) -> Result<Self, CoreError> {
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&parent)?;
        Ok(Self {
            backups_dir: parent.join(BACKUP_DIR_NAME),
            path,
            retention: retention.max(1),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(JSON_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            entries.push(BackupInfo {
                id: file_name.to_string(),
                created_at: parse_backup_stamp(file_name).map(|(stamp, _)| stamp),
                size_bytes,
                path,
            });
        }
        entries.sort_by_key(|info| Reverse(parse_backup_stamp(&info.id)));
        Ok(entries)
    }

    /// Writes the backup named `id` over the data file and returns it.
    ///
    /// The current data file is itself backed up first, so a restore can be
    /// reverted. The chosen backup is read before that, since rotation may
    /// prune it.
    pub fn restore_backup(&self, id: &str) -> Result<AppData, CoreError> {
        let source = self.backups_dir.join(id);
        if !source.is_file() {
            return Err(CoreError::Storage(format!("backup `{id}` not found")));
        }
        let restored = load_app_data_from_path(&source)?;
        self.backup_existing_file()?;
        save_app_data_to_path(&restored, &self.path)?;
        info!(backup = id, "restored ledger from backup");
        Ok(restored)
    }

    fn backup_existing_file(&self) -> Result<(), CoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.backups_dir)?;
        let stem = self
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("data");
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut backup_path = self
            .backups_dir
            .join(format!("{stem}_{timestamp}.{JSON_EXTENSION}"));
        let mut sequence = 1;
        while backup_path.exists() {
            backup_path = self
                .backups_dir
                .join(format!("{stem}_{timestamp}-{sequence}.{JSON_EXTENSION}"));
            sequence += 1;
        }
        fs::copy(&self.path, &backup_path)?;
        debug!(path = %backup_path.display(), "wrote backup");
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl AppDataStorage for JsonAppDataStorage {
    fn load(&self) -> Result<Option<AppData>, CoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        load_app_data_from_path(&self.path).map(Some)
    }

    fn save(&self, data: &AppData) -> Result<(), CoreError> {
        self.backup_existing_file()?;
        save_app_data_to_path(data, &self.path)
    }
}

/// Writes `data` to an arbitrary path through a temp file and rename.
pub fn save_app_data_to_path(data: &AppData, path: &Path) -> Result<(), CoreError> {
    let tmp = tmp_path(path);
    write_atomic(&tmp, &MigrationService::export_data(data)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads a blob of any supported shape from `path`.
pub fn load_app_data_from_path(path: &Path) -> Result<AppData, CoreError> {
    let contents = fs::read_to_string(path)?;
    MigrationService::import_data(&contents)
}

/// Splits `<stem>_<timestamp>[-<n>].json` into its sortable parts.
fn parse_backup_stamp(file_name: &str) -> Option<(NaiveDateTime, u32)> {
    let trimmed = file_name.strip_suffix(&format!(".{JSON_EXTENSION}"))?;
    let (_, stamp) = trimmed.rsplit_once('_')?;
    let (stamp, sequence) = match stamp.split_once('-') {
        Some((stamp, sequence)) => (stamp, sequence.parse().ok()?),
        None => (stamp, 0),
    };
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|parsed| (parsed, sequence))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
