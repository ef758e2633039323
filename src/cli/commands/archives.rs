//! Implementation of `logit <directory> --list` and `--clear-archives`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::types::Cli;
use crate::infrastructure::logging::RotationLedger;
use crate::infrastructure::paths::ProjectPaths;

#[derive(Debug, Serialize)]
pub struct LedgerEntryOutput {
    pub path: String,
    pub last_rotation: f64,
    pub rotated_at: String,
}

#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub archive_dir: PathBuf,
    pub archives: Vec<String>,
    pub ledger: Vec<LedgerEntryOutput>,
}

impl CommandOutput for ListOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();

        if self.archives.is_empty() {
            lines.push(format!("No archives in {}", self.archive_dir.display()));
        } else {
            lines.push(format!(
                "{} archive(s) in {}:",
                self.archives.len(),
                self.archive_dir.display()
            ));
            for name in &self.archives {
                lines.push(format!("  - {name}"));
            }
        }

        if !self.ledger.is_empty() {
            lines.push("\nLast rotations:".to_string());
            for entry in &self.ledger {
                lines.push(format!("  {}  {}", entry.rotated_at, entry.path));
            }
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct ClearOutput {
    pub archive_dir: PathBuf,
    pub removed: Vec<String>,
}

impl CommandOutput for ClearOutput {
    fn to_human(&self) -> String {
        if self.removed.is_empty() {
            return format!("No archives to remove in {}", self.archive_dir.display());
        }

        let mut lines = vec![format!(
            "Removed {} archive(s) from {}:",
            self.removed.len(),
            self.archive_dir.display()
        )];
        for name in &self.removed {
            lines.push(format!("  - {name}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run the actions selected on the command line, clearing before listing
pub fn execute(cli: &Cli) -> Result<()> {
    let paths = project_paths(&cli.directory)?;

    if cli.clear_archives {
        output(&clear(&paths)?, cli.json);
    }
    if cli.list {
        output(&list(&paths)?, cli.json);
    }
    Ok(())
}

/// Archives and ledger entries of a project
pub fn list(paths: &ProjectPaths) -> Result<ListOutput> {
    let ledger = RotationLedger::for_project(paths);

    let archives = ledger
        .archives()
        .context("Failed to list archives")?
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();

    let entries = ledger
        .entries()
        .context("Failed to read rotation ledger")?
        .into_iter()
        .map(|(path, last_rotation)| LedgerEntryOutput {
            rotated_at: format_timestamp(last_rotation),
            path,
            last_rotation,
        })
        .collect();

    Ok(ListOutput {
        archive_dir: ledger.archive_dir().to_path_buf(),
        archives,
        ledger: entries,
    })
}

/// Delete every archive of a project
pub fn clear(paths: &ProjectPaths) -> Result<ClearOutput> {
    let ledger = RotationLedger::for_project(paths);
    let removed = ledger
        .clear_archives()
        .context("Failed to clear archives")?;

    Ok(ClearOutput {
        archive_dir: ledger.archive_dir().to_path_buf(),
        removed,
    })
}

fn project_paths(directory: &Path) -> Result<ProjectPaths> {
    if !directory.is_dir() {
        bail!("Not a directory: {}", directory.display());
    }
    Ok(ProjectPaths::new(directory))
}

#[allow(clippy::cast_possible_truncation)]
fn format_timestamp(seconds: f64) -> String {
    DateTime::from_timestamp(seconds.trunc() as i64, 0).map_or_else(
        || seconds.to_string(),
        |time| {
            time.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    )
}
