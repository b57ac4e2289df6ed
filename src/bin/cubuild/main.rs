//! Cubuild CLI - CUDA toolkit discovery and extension building

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cubuild=debug")
    } else {
        EnvFilter::new("cubuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Doctor => commands::doctor::execute(),
        Commands::Flags(args) => commands::flags::execute(args),
        Commands::Build(args) => commands::build::execute(args),
    }
}
