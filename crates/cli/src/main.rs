//! Dona Oferta CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! oferta-cli migrate
//!
//! # Register a supermarket
//! oferta-cli supermarket add -n "Mercado Bom Preço" -r "Centro - SP" \
//!     --range-start 01000000 --range-end 05999999 --mode site
//!
//! # List registered supermarkets
//! oferta-cli supermarket list
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `supermarket add` - Register a supermarket with its CEP coverage range
//! - `supermarket list` - Show registered supermarkets

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "oferta-cli")]
#[command(author, version, about = "Dona Oferta CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage supermarkets
    Supermarket {
        #[command(subcommand)]
        action: SupermarketAction,
    },
}

#[derive(Subcommand)]
enum SupermarketAction {
    /// Register a new supermarket
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Region label (e.g., "Centro - SP")
        #[arg(short, long)]
        region: String,

        /// First CEP covered, inclusive (digits only or 00000-000)
        #[arg(long)]
        range_start: String,

        /// Last CEP covered, inclusive (digits only or 00000-000)
        #[arg(long)]
        range_end: String,

        /// Extraction mode (`site` or `pdf`)
        #[arg(short, long, default_value = "site")]
        mode: String,
    },
    /// List registered supermarkets
    List,
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
        Commands::Supermarket { action } => match action {
            SupermarketAction::Add {
                name,
                region,
                range_start,
                range_end,
                mode,
            } => {
                commands::supermarket::add(&name, &region, &range_start, &range_end, &mode).await?;
            }
            SupermarketAction::List => commands::supermarket::list().await?,
        },
    }
    Ok(())
}
