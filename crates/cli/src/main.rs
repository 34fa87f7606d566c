//! Client Directory CLI - Database migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cdir-cli migrate
//!
//! # Load states, cities and locations from a YAML catalog
//! cdir-cli seed --file data/catalog.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `DIRECTORY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cdir-cli")]
#[command(author, version, about = "Client directory CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed states, cities and locations from a YAML catalog
    Seed {
        /// Path to the catalog file
        #[arg(short, long, default_value = "data/catalog.yaml")]
        file: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => {
            commands::seed::catalog(&file).await?;
        }
    }
    Ok(())
}
