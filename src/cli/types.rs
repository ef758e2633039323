//! CLI type definitions

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "logit")]
#[command(about = "Inspect and clean up logit rotation archives", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project directory holding `.logit` and `.logit-archives`
    pub directory: PathBuf,

    /// Delete every archived log file of the project
    #[arg(long)]
    pub clear_archives: bool,

    /// List archived log files and rotation ledger entries
    #[arg(short, long)]
    pub list: bool,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,
}

impl Cli {
    /// Whether any action flag was given
    pub const fn has_action(&self) -> bool {
        self.clear_archives || self.list
    }
}
