//! Project-local locations used by the logger
//!
//! ```text
//! <root>/
//!   .logit/
//!     ledger.json      rotation ledger
//!     config.yaml      optional logger settings
//!   .logit-archives/   rotated log files
//! ```

use std::path::{Path, PathBuf};

use crate::domain::error::{LogitError, LogitResult};

/// Hidden configuration directory name
pub const CONFIG_DIR: &str = ".logit";

/// Archive directory name, a sibling of [`CONFIG_DIR`]
pub const ARCHIVE_DIR: &str = ".logit-archives";

/// Rotation ledger file name inside [`CONFIG_DIR`]
pub const LEDGER_FILE: &str = "ledger.json";

/// Settings file name inside [`CONFIG_DIR`]
pub const SETTINGS_FILE: &str = "config.yaml";

/// Locations derived from a project root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    /// Paths for the project rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self { root }
    }

    /// Paths for the project rooted at the current working directory
    pub fn current() -> LogitResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| LogitError::io("read", Path::new("current directory"), e))?;
        Ok(Self::new(cwd))
    }

    /// Project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Hidden configuration directory
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR)
    }

    /// Rotation ledger document
    pub fn ledger_file(&self) -> PathBuf {
        self.config_dir().join(LEDGER_FILE)
    }

    /// Optional YAML settings file
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir().join(SETTINGS_FILE)
    }

    /// Directory holding archived log files
    pub fn archive_dir(&self) -> PathBuf {
        self.root.join(ARCHIVE_DIR)
    }

    /// Resolve a log file path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = ProjectPaths::new("/srv/app");
        assert_eq!(paths.config_dir(), PathBuf::from("/srv/app/.logit"));
        assert_eq!(paths.ledger_file(), PathBuf::from("/srv/app/.logit/ledger.json"));
        assert_eq!(paths.settings_file(), PathBuf::from("/srv/app/.logit/config.yaml"));
        assert_eq!(paths.archive_dir(), PathBuf::from("/srv/app/.logit-archives"));
    }

    #[test]
    fn test_resolve() {
        let paths = ProjectPaths::new("/srv/app");
        assert_eq!(
            paths.resolve(Path::new("logs/app.log")),
            PathBuf::from("/srv/app/logs/app.log")
        );
        assert_eq!(
            paths.resolve(Path::new("/var/log/app.log")),
            PathBuf::from("/var/log/app.log")
        );
    }

    #[test]
    fn test_relative_root_becomes_absolute() {
        let paths = ProjectPaths::new("project");
        assert!(paths.root().is_absolute());
        assert!(paths.root().ends_with("project"));
    }
}
