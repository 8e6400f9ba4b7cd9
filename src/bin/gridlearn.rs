//! gridlearn CLI - Train a Q-learning agent on a grid
//!
//! Logging goes through `tracing`; set `RUST_LOG` (for example
//! `RUST_LOG=gridlearn=debug`) to see per-turn events.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridlearn")]
#[command(version, about = "Grid agent with tabular Q-learning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play turns and report what the agent learned
    Run(Box<gridlearn::cli::commands::run::RunArgs>),

    /// Print the default configuration
    Config(gridlearn::cli::commands::config::ConfigArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => gridlearn::cli::commands::run::execute(*args),
        Commands::Config(args) => gridlearn::cli::commands::config::execute(args),
    }
}
