//! Imeliq CLI - database migrations and data export.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! imeliq-cli migrate
//!
//! # Export one category to CSV (defaults to imeliq_<type>_<date>.csv)
//! imeliq-cli export --type orders
//! imeliq-cli export --type feedback --output feedback.csv
//! ```
//!
//! Both commands read `IMELIQ_DATABASE_URL` (or `DATABASE_URL`), loading a
//! `.env` file first if one exists.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use imeliq_core::DataCategory;

mod commands;

#[derive(Parser)]
#[command(name = "imeliq-cli")]
#[command(author, version, about = "Imeliq CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Export one data category as CSV
    Export {
        /// Category to export (`feedback`, `orders`, `testers`, `stats`)
        #[arg(short = 't', long = "type", value_parser = parse_category)]
        kind: DataCategory,

        /// Output file (defaults to `imeliq_<type>_<date>.csv`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_category(raw: &str) -> Result<DataCategory, String> {
    match raw.parse() {
        Ok(DataCategory::All) => Err("export needs a single type".to_string()),
        Ok(category) => Ok(category),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() {
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
        Commands::Export { kind, output } => {
            commands::export::run(kind, output).await?;
        }
    }
    Ok(())
}
