//! Command-line interface of the `logit` binary.

pub mod commands;
pub mod output;
pub mod types;

pub use types::Cli;

/// Report a failed command and exit with a non-zero status
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    output::output_error(&err, json_mode);
    std::process::exit(1);
}
