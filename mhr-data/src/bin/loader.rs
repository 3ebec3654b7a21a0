use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mhr_core::calculations::MachineHourRateCalculator;
use mhr_data::MachineCsvLoader;
use mhr_db_sqlite::{SqliteRepository, connection_url};
use tracing_subscriber::EnvFilter;

/// Load machine data from a CSV file into the database.
///
/// The header row names the columns; any input column may be left out and
/// reads as zero. Each machine is costed on load and upserted by
/// `machine_name`, so re-running with the same file is safe.
#[derive(Parser, Debug)]
#[command(name = "mhr-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing machine data
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database file or URL (`:memory:` for a throwaway database)
    #[arg(short, long, default_value = "mhr.db")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();
    let url = connection_url(&args.database);

    let repo = SqliteRepository::new(&url)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    println!("Loading machines from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = MachineCsvLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let summary = MachineCsvLoader::load(&repo, &MachineHourRateCalculator::default(), &records)
        .await
        .context("Failed to load machines into database")?;

    println!(
        "Successfully loaded {} machines ({} new, {} updated).",
        summary.total(),
        summary.created,
        summary.updated
    );

    Ok(())
}
