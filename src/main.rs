//! Logit CLI entry point.

use clap::{CommandFactory, Parser};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use logit::cli::{commands, handle_error, Cli};

fn main() {
    let cli = Cli::parse();

    // stdout carries command output only
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(cli.json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!cli.json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    if !cli.has_action() {
        if let Err(err) = Cli::command().print_help() {
            handle_error(err.into(), cli.json);
        }
        return;
    }

    if let Err(err) = commands::archives::execute(&cli) {
        handle_error(err, cli.json);
    }
}
