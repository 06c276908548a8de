//! Main entry point for the apple-userag CLI

use anyhow::Result;
use clap::Parser;

use apple_userag::cli::{Cli, Commands};
use apple_userag::commands;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logger, RUST_LOG still takes precedence
    let default_level = match (cli.verbose, cli.quiet) {
        (0, true) => "error",
        (0, false) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Execute command
    match cli.command {
        Commands::Update => commands::update::execute(cli.data_file, cli.quiet).await,
    }
}
