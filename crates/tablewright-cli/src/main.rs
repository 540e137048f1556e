//! Tablewright CLI - tabular transformation engine.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "tablewright starting");

    let result = match cli.command {
        Commands::Run {
            file,
            pipeline,
            output,
            format,
            preview,
        } => commands::run::run(file, pipeline, output, format, preview, cli.verbose),

        Commands::Inspect { file, rows, json } => {
            commands::inspect::run(file, rows, json, cli.verbose)
        }

        Commands::Steps { file } => commands::steps::run(file, cli.verbose),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
