mod cli;
mod db;
mod error;
mod files;
mod models;
mod transfer;

use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so connection flags can fall back to it
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let action = match cli.command {
        Commands::Export(_) => "export",
        Commands::Import(_) => "import",
    };
    info!("Starting {}...", action);

    if let Err(e) = cli::run(cli).await {
        error!("{} failed: {:?}", action, e);
        eprintln!("{} {}", "Error:".red().bold(), e.to_string().red());
        return ExitCode::FAILURE;
    }

    info!("{} completed successfully", action);
    ExitCode::SUCCESS
}
