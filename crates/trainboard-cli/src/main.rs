//! trainboard CLI - Training Campaign Scheduling Board
//!
//! Command-line front end over the board engine: render a month board,
//! list active campaigns, and check a board file's data quality.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trainboard_core::dates::{self, YearMonth};
use trainboard_core::{RecordStore, TrainingRecord};

mod data;
mod render;

use data::JsonFileStore;

#[derive(Parser)]
#[command(name = "trainboard")]
#[command(author, version, about = "Training campaign scheduling board", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the month board as text
    Board {
        /// Board file (JSON)
        #[arg(value_name = "FILE")]
        data: PathBuf,

        /// Month to render, e.g. 2024-03 (defaults to the current month)
        #[arg(short, long)]
        month: Option<YearMonth>,
    },

    /// List the campaigns active in a month, with their board colors
    Campaigns {
        /// Board file (JSON)
        #[arg(value_name = "FILE")]
        data: PathBuf,

        /// Month to inspect (defaults to the current month)
        #[arg(short, long)]
        month: Option<YearMonth>,
    },

    /// Report records whose dates keep them out of calendar views
    Check {
        /// Board file (JSON)
        #[arg(value_name = "FILE")]
        data: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Board { data, month } => {
            let store = open(&data)?;
            let records = store.fetch_training_records()?;
            let master = store.fetch_master_data()?;
            let novedades = store.fetch_novedades()?;

            let today = chrono::Local::now().date_naive();
            let month = month.unwrap_or_else(|| YearMonth::from_date(today));
            print!(
                "{}",
                render::render_board(month, &records, &master.festivos, &novedades, today)
            );
        }

        Commands::Campaigns { data, month } => {
            let store = open(&data)?;
            let records = store.fetch_training_records()?;
            let month =
                month.unwrap_or_else(|| YearMonth::from_date(chrono::Local::now().date_naive()));
            print!("{}", render::render_campaigns(month, &records));
        }

        Commands::Check { data } => {
            let store = open(&data)?;
            let records = store.fetch_training_records()?;
            print!("{}", check_report(&records));
        }
    }

    Ok(())
}

fn open(path: &Path) -> Result<JsonFileStore> {
    JsonFileStore::open(path).with_context(|| format!("cannot load board file {}", path.display()))
}

/// Per-record report of interval problems. Records listed here are the ones
/// the calendar silently drops from date-driven views.
fn check_report(records: &[TrainingRecord]) -> String {
    let mut out = String::new();
    let mut excluded = 0usize;

    for (position, record) in records.iter().enumerate() {
        let label = match record.row_index {
            Some(row) => format!("fila {row}"),
            None => format!("registro {position}"),
        };

        let mut issues: Vec<&str> = Vec::new();
        bound_issues(
            &mut issues,
            record.fecha_inicio.as_deref(),
            "sin fechaInicio",
            "fechaInicio no interpretable",
        );
        bound_issues(
            &mut issues,
            record.fecha_fin.as_deref(),
            "sin fechaFin",
            "fechaFin no interpretable",
        );

        if issues.is_empty() {
            let start = dates::parse(record.fecha_inicio.as_deref());
            let end = dates::parse(record.fecha_fin.as_deref());
            if let (Some(start), Some(end)) = (start, end) {
                if start > end {
                    issues.push("intervalo invertido");
                }
            }
        }

        if !issues.is_empty() {
            excluded += 1;
            out.push_str(&format!("{label}: {}\n", issues.join(", ")));
        }
    }

    out.push_str(&format!(
        "{excluded} de {} registros quedan fuera de las vistas por fechas\n",
        records.len()
    ));
    out
}

fn bound_issues<'a>(issues: &mut Vec<&'a str>, value: Option<&str>, missing: &'a str, bad: &'a str) {
    match value {
        None => issues.push(missing),
        Some(v) if v.trim().is_empty() => issues.push(missing),
        Some(v) if dates::parse(Some(v)).is_none() => issues.push(bad),
        Some(_) => {}
    }
}
