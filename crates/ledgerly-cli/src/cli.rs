//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ledgerly - Categorize bank statement exports
#[derive(Parser)]
#[command(name = "ledgerly")]
#[command(about = "Hybrid rule/AI categorizer for bank statement CSVs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "ledgerly.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Categorize a statement CSV
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Column holding the transaction date
        #[arg(long, default_value = "Date")]
        date_col: String,

        /// Column holding the transaction description
        #[arg(long, default_value = "Description")]
        desc_col: String,

        /// Optional column holding an explicit category
        #[arg(long)]
        category_col: Option<String>,
    },

    /// Manually override the category for a merchant
    Override {
        /// Merchant name (normalized before storage)
        #[arg(short, long)]
        merchant: String,

        /// Category to pin for this merchant
        #[arg(short, long)]
        category: String,
    },

    /// List cached merchant categories
    Cache,
}
