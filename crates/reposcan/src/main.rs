// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reposcan - repository-scan standup worker.
//!
//! This is the binary entry point for the reposcan service.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod health;
mod processor;
mod serve;
mod shutdown;

/// Reposcan - repository-scan standup worker.
#[derive(Parser, Debug)]
#[command(name = "reposcan", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the scan worker: consume scan:jobs, publish scan:results.
    Serve,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            let config = match reposcan_config::load_config() {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("error: invalid configuration: {e}");
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
    }
}
