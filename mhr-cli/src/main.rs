use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::debug;

use mhr_cli::app::{self, SaveAction};
use mhr_cli::config::{AppConfig, DATABASE_ENV_VAR};
use mhr_cli::logging;
use mhr_cli::summary::{MachineTable, RateSummary};
use mhr_core::RepositoryError;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Machine hour rate calculator.
///
/// Costs a machine from its investment, space, power, consumables, labour
/// and overhead inputs, and keeps a library of saved machines.
#[derive(Debug, Parser)]
#[command(name = "mhr", version)]
struct Cli {
    /// Config file (default: ./mhr.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database connection string. For SQLite this is a file path
    /// (e.g. `machines.db`) or `:memory:`. Overrides MHR_DATABASE.
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate the rate for an input file without saving it.
    Calc {
        /// TOML file holding the machine input.
        file: PathBuf,
    },
    /// Calculate and save a machine, replacing one with the same name.
    Save {
        /// Machine name.
        #[arg(long)]
        name: String,
        /// TOML file holding the machine input.
        file: PathBuf,
    },
    /// List saved machines, most recently updated first.
    List,
    /// Show the breakdown of a saved machine.
    Show {
        /// Machine id or name.
        machine: String,
    },
    /// Delete a saved machine.
    Delete {
        /// Machine id or name.
        machine: String,
    },
    /// Recompute every saved machine with the current costing settings.
    Recalc,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?
        .with_database_override(std::env::var(DATABASE_ENV_VAR).ok(), cli.db);
    logging::init_logging(&config.logging)?;
    debug!(?config, "Configuration loaded");

    let calculator = app::build_calculator(&config)?;

    if let Command::Calc { file } = &cli.command {
        let input = app::read_input_file(file)?;
        let output = calculator.output(&input);
        println!(
            "{}",
            RateSummary {
                machine_name: None,
                output: &output,
            }
        );
        return Ok(());
    }

    let repo = app::open_repository(&config).await?;

    match cli.command {
        Command::Calc { .. } => {}
        Command::Save { name, file } => {
            let name = name.trim();
            if name.is_empty() {
                bail!("machine name must not be empty");
            }
            let input = app::read_input_file(&file)?;
            let (record, action) = app::save_machine(&*repo, &calculator, name, input)
                .await
                .with_context(|| format!("cannot save machine '{name}'"))?;
            let verb = match action {
                SaveAction::Created => "Saved",
                SaveAction::Updated => "Updated",
            };
            println!("{verb} machine {} (id {})", record.machine_name, record.id);
            if let Some(output) = &record.output {
                println!(
                    "{}",
                    RateSummary {
                        machine_name: None,
                        output,
                    }
                );
            }
        }
        Command::List => {
            let machines = repo.list_machines().await.context("cannot list machines")?;
            println!("{}", MachineTable(&machines));
        }
        Command::Show { machine } => {
            let record = lookup(&*repo, &machine).await?;
            match &record.output {
                Some(output) => println!(
                    "{}",
                    RateSummary {
                        machine_name: Some(&record.machine_name),
                        output,
                    }
                ),
                None => println!(
                    "{}\n  not calculated yet; run `mhr recalc`",
                    record.machine_name
                ),
            }
        }
        Command::Delete { machine } => {
            let record = lookup(&*repo, &machine).await?;
            repo.delete_machine(record.id)
                .await
                .with_context(|| format!("cannot delete machine '{}'", record.machine_name))?;
            println!("Deleted machine {} (id {})", record.machine_name, record.id);
        }
        Command::Recalc => {
            let count = app::recalculate_all(&*repo, &calculator)
                .await
                .context("cannot recalculate machines")?;
            println!("Recalculated {count} machines.");
        }
    }

    Ok(())
}

async fn lookup(
    repo: &dyn mhr_core::MachineRepository,
    key: &str,
) -> anyhow::Result<mhr_core::MachineRecord> {
    match app::find_machine(repo, key).await {
        Err(RepositoryError::NotFound) => bail!("no machine matches '{key}'"),
        other => other.with_context(|| format!("cannot load machine '{key}'")),
    }
}
