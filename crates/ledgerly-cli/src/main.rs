//! Ledgerly CLI - Bank statement categorizer
//!
//! Usage:
//!   ledgerly init                                  Initialize database
//!   ledgerly import --file statement.csv           Categorize a statement
//!   ledgerly override --merchant M --category C    Pin a merchant's category
//!   ledgerly cache                                 Show learned merchants

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Import {
            file,
            date_col,
            desc_col,
            category_col,
        } => {
            commands::cmd_import(&cli.db, &file, &date_col, &desc_col, category_col.as_deref())
                .await
        }
        Commands::Override { merchant, category } => {
            commands::cmd_override(&cli.db, &merchant, &category)
        }
        Commands::Cache => commands::cmd_cache(&cli.db),
    }
}
