use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use savings_core::{CoreError, KeyValueStore};
use tracing::{debug, info, warn};

const FILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed key-value store: each key lives in its own JSON file,
/// and every overwrite first snapshots the previous contents.
#[derive(Debug, Clone)]
pub struct JsonKeyValueStore {
    data_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

/// A snapshot of one key's file.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    pub key: String,
    /// File name inside the key's backup directory.
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl JsonKeyValueStore {
    pub fn new(data_dir: PathBuf, backups_dir: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(data_dir, backups_dir, DEFAULT_RETENTION)
    }

    /// Keeps at most `retention` backups per key; anything below one is treated as one.
    pub fn with_retention(
        data_dir: PathBuf,
        backups_dir: PathBuf,
        retention: usize,
    ) -> Result<Self, CoreError> {
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            data_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", canonical_name(key), FILE_EXTENSION))
    }

    pub fn backup_dir(&self, key: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(key))
    }

    /// Snapshots the key's current contents, optionally tagging the file name with a note.
    pub fn backup(&self, key: &str, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        let source = self.path_for(key);
        if !source.exists() {
            return Err(CoreError::Storage(format!(
                "nothing stored under `{key}` to back up"
            )));
        }
        self.copy_to_backup(key, &source, note)
    }

    /// Backups for a key, newest first.
    pub fn list_backups(&self, key: &str) -> Result<Vec<BackupInfo>, CoreError> {
        let dir = self.backup_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(key);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION)
            {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let metadata = fs::metadata(&path).ok();
            let modified = metadata.as_ref().and_then(|meta| meta.modified().ok());
            let info = BackupInfo {
                key: slug.clone(),
                id: file_name.to_string(),
                created_at: parse_backup_timestamp(&slug, file_name),
                size_bytes: metadata.map(|meta| meta.len()).unwrap_or(0),
                path: path.clone(),
            };
            entries.push((info, modified));
        }
        // Stamps only resolve to the minute; file mtime orders backups within one.
        entries.sort_by_key(|(info, modified)| {
            (Reverse(info.created_at), Reverse(*modified), Reverse(info.id.clone()))
        });
        Ok(entries.into_iter().map(|(info, _)| info).collect())
    }

    /// Puts a backup's contents back under its key and returns them.
    ///
    /// The backup must hold valid JSON; the current file is snapshotted
    /// before it is replaced.
    pub fn restore(&self, key: &str, backup_id: &str) -> Result<String, CoreError> {
        let backup = self.backup_dir(key).join(backup_id);
        if !backup.is_file() {
            return Err(CoreError::Storage(format!("backup `{backup_id}` not found")));
        }
        let payload = fs::read_to_string(&backup)?;
        serde_json::from_str::<serde_json::Value>(&payload)?;

        let target = self.path_for(key);
        if target.exists() {
            self.copy_to_backup(key, &target, Some("before-restore"))?;
        }
        write_atomic(&target, &payload)?;
        info!(key, backup = backup_id, "backup restored");
        Ok(payload)
    }

    pub fn delete_backup(&self, key: &str, backup_id: &str) -> Result<(), CoreError> {
        let path = self.backup_dir(key).join(backup_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn copy_to_backup(
        &self,
        key: &str,
        source: &Path,
        note: Option<&str>,
    ) -> Result<BackupInfo, CoreError> {
        let dir = self.backup_dir(key);
        fs::create_dir_all(&dir)?;
        let slug = canonical_name(key);
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{slug}_{timestamp}");
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let path = unique_path(&dir, &stem);
        fs::copy(source, &path)?;
        debug!(key, backup = %path.display(), "backup written");
        self.prune_backups(key)?;

        let id = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
        Ok(BackupInfo {
            created_at: parse_backup_timestamp(&slug, &id),
            key: slug,
            id,
            size_bytes,
            path,
        })
    }

    fn prune_backups(&self, key: &str) -> Result<(), CoreError> {
        for stale in self.list_backups(key)?.into_iter().skip(self.retention) {
            debug!(key, backup = %stale.id, "pruning backup");
            remove_stale_backup(key, &stale.path);
        }
        Ok(())
    }
}

impl KeyValueStore for JsonKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.path_for(key);
        if path.exists() {
            self.copy_to_backup(key, &path, None)?;
        }
        write_atomic(&path, value)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// File-system safe slug for a key: lowercase ASCII letters and digits, everything else `_`.
pub fn canonical_name(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "plans".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Reads the `%Y%m%d_%H%M` stamp that follows the slug in a backup file name.
fn parse_backup_timestamp(slug: &str, file_name: &str) -> Option<DateTime<Utc>> {
    let rest = file_name.strip_prefix(slug)?.strip_prefix('_')?;
    let stamp = rest.get(..13)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Pruning is best effort; a backup that cannot be removed is logged and left in place.
fn remove_stale_backup(key: &str, path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(err) => {
            warn!(key, backup = %path.display(), error = %err, "failed to prune backup");
            false
        }
    }
}

/// Backups taken within the same minute get a numeric suffix instead of overwriting each other.
fn unique_path(dir: &Path, stem: &str) -> PathBuf {
    let first = dir.join(format!("{stem}.{FILE_EXTENSION}"));
    if !first.exists() {
        return first;
    }
    (2..)
        .map(|n| dir.join(format!("{stem}-{n}.{FILE_EXTENSION}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
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

/// Writes through a sibling `.tmp` file and renames it into place.
fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
