//! Rotation ledger and log archiving
//!
//! The ledger remembers, per log file, when it was last rotated:
//!
//! ```json
//! {
//!   "/abs/path/app.log": {
//!     "last_rotation": 1677050919.7114477
//!   }
//! }
//! ```
//!
//! Every read loads the whole document and every write replaces it. There is
//! no file locking, so two processes sharing a project overwrite each other's
//! updates (last writer wins).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::error::{LogitError, LogitResult};
use crate::infrastructure::paths::ProjectPaths;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct LedgerEntry {
    last_rotation: f64,
}

type LedgerDocument = BTreeMap<String, LedgerEntry>;

/// Current time as float seconds since the Unix epoch
#[allow(clippy::cast_precision_loss)]
pub fn unix_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Persisted last-rotation bookkeeping plus the archive directory
#[derive(Debug, Clone)]
pub struct RotationLedger {
    ledger_file: PathBuf,
    archive_dir: PathBuf,
}

impl RotationLedger {
    /// Create a ledger over explicit file and archive locations
    pub fn new(ledger_file: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            ledger_file: ledger_file.into(),
            archive_dir: archive_dir.into(),
        }
    }

    /// Ledger stored in a project's hidden configuration directory
    pub fn for_project(paths: &ProjectPaths) -> Self {
        Self::new(paths.ledger_file(), paths.archive_dir())
    }

    /// Location of the ledger document
    pub fn ledger_file(&self) -> &Path {
        &self.ledger_file
    }

    /// Directory archived logs are moved into
    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Last rotation time of `log_path`.
    ///
    /// A path seen for the first time is recorded as rotated now, so a file
    /// is never overdue on its first observation.
    pub fn last_rotation(&self, log_path: &Path) -> LogitResult<f64> {
        self.last_rotation_or_init(log_path, unix_now())
    }

    /// Overwrite the last rotation time of `log_path`
    pub fn save_last_rotation(&self, log_path: &Path, timestamp: f64) -> LogitResult<()> {
        let mut document = self.load()?;
        document.insert(
            ledger_key(log_path),
            LedgerEntry {
                last_rotation: timestamp,
            },
        );
        self.store(&document)
    }

    /// Whether at least `threshold_seconds` have passed since the last rotation
    pub fn is_rotation_due(
        &self,
        log_path: &Path,
        threshold_seconds: u64,
        now: f64,
    ) -> LogitResult<bool> {
        let last = self.last_rotation_or_init(log_path, now)?;
        #[allow(clippy::cast_precision_loss)]
        let due = now - last >= threshold_seconds as f64;

        debug!(
            path = %log_path.display(),
            elapsed = now - last,
            threshold = threshold_seconds,
            due,
            "checked time-based rotation"
        );

        Ok(due)
    }

    /// All ledger entries as `(path, last_rotation)` pairs
    pub fn entries(&self) -> LogitResult<Vec<(String, f64)>> {
        Ok(self
            .load()?
            .into_iter()
            .map(|(path, entry)| (path, entry.last_rotation))
            .collect())
    }

    /// Move `log_path` into the archive directory and leave an empty file behind.
    ///
    /// The archive is named `{YYYY-MM-DD}-archive-{basename}`; a numeric
    /// suffix is appended when that name is already taken. The original path
    /// is missing only between the move and the recreate.
    ///
    /// # Returns
    /// Path of the archived file
    pub fn move_to_archive(&self, log_path: &Path) -> LogitResult<PathBuf> {
        let base_name = log_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                LogitError::InvalidConfig(format!(
                    "log file path has no file name: {}",
                    log_path.display()
                ))
            })?;

        fs::create_dir_all(&self.archive_dir)
            .map_err(|e| LogitError::io("create archive directory", &self.archive_dir, e))?;

        let archive_path = self.archive_path_for(base_name);

        if fs::rename(log_path, &archive_path).is_err() {
            // rename cannot cross filesystems
            fs::copy(log_path, &archive_path)
                .map_err(|e| LogitError::io("archive", log_path, e))?;
            fs::remove_file(log_path).map_err(|e| LogitError::io("remove", log_path, e))?;
        }

        fs::File::create(log_path).map_err(|e| LogitError::io("recreate", log_path, e))?;

        info!(
            old_path = %log_path.display(),
            archive_path = %archive_path.display(),
            "archived log file"
        );

        Ok(archive_path)
    }

    /// Archived files, sorted by name
    pub fn archives(&self) -> LogitResult<Vec<PathBuf>> {
        if !self.archive_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.archive_dir)
            .map_err(|e| LogitError::io("read archive directory", &self.archive_dir, e))?;

        let mut archives = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| LogitError::io("read archive entry in", &self.archive_dir, e))?;
            archives.push(entry.path());
        }
        archives.sort();
        Ok(archives)
    }

    /// Delete every archived file.
    ///
    /// # Returns
    /// Names of the removed files
    pub fn clear_archives(&self) -> LogitResult<Vec<String>> {
        let mut removed = Vec::new();
        for path in self.archives()? {
            if path.is_dir() {
                fs::remove_dir_all(&path).map_err(|e| LogitError::io("remove", &path, e))?;
            } else {
                fs::remove_file(&path).map_err(|e| LogitError::io("remove", &path, e))?;
            }
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!(archive = %name, "removed archived log");
            removed.push(name);
        }
        Ok(removed)
    }

    fn last_rotation_or_init(&self, log_path: &Path, now: f64) -> LogitResult<f64> {
        let mut document = self.load()?;
        let key = ledger_key(log_path);

        if let Some(entry) = document.get(&key) {
            return Ok(entry.last_rotation);
        }

        debug!(path = %key, "initializing rotation ledger entry");
        document.insert(key, LedgerEntry { last_rotation: now });
        self.store(&document)?;
        Ok(now)
    }

    fn archive_path_for(&self, base_name: &str) -> PathBuf {
        let stem = format!("{}-archive-{base_name}", Local::now().format("%Y-%m-%d"));
        let mut candidate = self.archive_dir.join(&stem);
        let mut counter = 1;
        while candidate.exists() {
            candidate = self.archive_dir.join(format!("{stem}.{counter}"));
            counter += 1;
        }
        candidate
    }

    fn load(&self) -> LogitResult<LedgerDocument> {
        if !self.ledger_file.exists() {
            return Ok(LedgerDocument::new());
        }

        let raw = fs::read_to_string(&self.ledger_file)
            .map_err(|e| LogitError::io("read rotation ledger", &self.ledger_file, e))?;

        if raw.trim().is_empty() {
            return Ok(LedgerDocument::new());
        }

        match serde_json::from_str(&raw) {
            Ok(document) => Ok(document),
            Err(e) => {
                warn!(
                    path = %self.ledger_file.display(),
                    error = %e,
                    "rotation ledger is corrupt, starting from an empty ledger"
                );
                Ok(LedgerDocument::new())
            }
        }
    }

    fn store(&self, document: &LedgerDocument) -> LogitResult<()> {
        if let Some(parent) = self.ledger_file.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| LogitError::io("create ledger directory", parent, e))?;
        }

        let json = serde_json::to_string_pretty(document).map_err(|e| {
            LogitError::io("serialize rotation ledger", &self.ledger_file, e.into())
        })?;

        let staging = self.ledger_file.with_extension("json.tmp");
        fs::write(&staging, json).map_err(|e| LogitError::io("write", &staging, e))?;
        fs::rename(&staging, &self.ledger_file)
            .map_err(|e| LogitError::io("replace rotation ledger", &self.ledger_file, e))
    }
}

fn ledger_key(log_path: &Path) -> String {
    std::path::absolute(log_path)
        .unwrap_or_else(|_| log_path.to_path_buf())
        .display()
        .to_string()
}
