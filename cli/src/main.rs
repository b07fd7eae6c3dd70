//! Mirror CLI - walk, tag and compare type schemas.

mod cli;
mod commands;
mod common;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Command};

fn main() -> ExitCode {
    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the log level, WARN if not set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Walk(args) => commands::walk::run(args),
        Command::Tags(args) => commands::tags::run(args),
        Command::Layout(args) => commands::layout::run(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => common::error::render_and_exit(e, cli.no_color),
    }
}
