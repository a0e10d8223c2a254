//! Telecast CLI - Configuration inspection tool
//!
//! Features:
//! - Configuration validation with recovery hints
//! - Resource listing
//! - Egress endpoint resolution

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

/// Telecast CLI - Video configuration toolkit
#[derive(Parser)]
#[command(name = "telecast-cli")]
#[command(version)]
#[command(about = "Inspect and validate Telecast video configurations", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration document
    Validate {
        /// Path to the configuration JSON
        config: PathBuf,
    },

    /// List configured resources
    Resources {
        /// Path to the configuration JSON
        config: PathBuf,
    },

    /// Show egress endpoints for a live resource
    Egress {
        /// Path to the configuration JSON
        config: PathBuf,

        /// Live resource identifier
        resource: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(level).init();

    match cli.command {
        Commands::Validate { config } => {
            commands::validate(&config)?;
        }
        Commands::Resources { config } => {
            commands::resources(&config, &cli.format)?;
        }
        Commands::Egress { config, resource } => {
            commands::egress(&config, &resource)?;
        }
    }

    Ok(())
}
